use prospector_core::{State, Transition};

use super::{abandon_target, TravelingState};
use crate::entities::{Depot, ShipBody};
use crate::events::GameEvent;
use crate::sector::Sector;

/// Unloads the hold into the player's storage.
///
/// The hold is emptied only after the depot accepts the whole cargo. A
/// refusal keeps the ship here and the offer is repeated every tick.
#[derive(Debug, Default)]
pub struct DepositingState {
    /// A refusal has already been reported during this visit.
    refused: bool,
}

impl State<ShipBody, Sector> for DepositingState {
    fn on_enter(&mut self, _body: &mut ShipBody, _sector: &mut Sector) -> Transition {
        self.refused = false;
        Transition::Stay
    }

    fn update(&mut self, body: &mut ShipBody, sector: &mut Sector, _dt: f32) -> Transition {
        if !body.inventory.is_empty() {
            if !sector.player.deposit(&body.inventory) {
                if !self.refused {
                    tracing::warn!(
                        ship = body.id.0,
                        cargo = body.inventory.total(),
                        "base storage refused cargo, holding"
                    );
                    self.refused = true;
                }
                return Transition::Stay;
            }

            let amount = body.inventory.total();
            body.inventory.clear();
            sector.emit(GameEvent::CargoDeposited {
                ship: body.id,
                amount,
            });
        }

        match body.mining_target {
            Some(handle) if sector.minable_asteroid(handle).is_some() => {
                Transition::to::<TravelingState>()
            }
            _ => abandon_target(body),
        }
    }
}
