use prospector_core::{State, Transition};

use super::TravelingState;
use crate::entities::ShipBody;
use crate::sector::Sector;

/// Holds position until given something to do.
///
/// Picks up a mining target assigned while idle. Follow orders arrive as
/// forced transitions.
#[derive(Debug, Default)]
pub struct IdleState;

impl State<ShipBody, Sector> for IdleState {
    fn update(&mut self, body: &mut ShipBody, _sector: &mut Sector, _dt: f32) -> Transition {
        if body.mining_target.is_some() && body.ship_type.can_mine() {
            Transition::to::<TravelingState>()
        } else {
            Transition::Stay
        }
    }
}
