//! # Cargo Holds
//!
//! One counter per resource type, stored inline.
//! Zero allocations during gameplay.

/// Minable resource types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    /// Common structural metal.
    Iron,
    /// Alloying metal.
    Nickel,
    /// Battery metal.
    Cobalt,
    /// Rare and valuable.
    Platinum,
    /// Frozen volatiles.
    Ice,
}

impl ResourceType {
    /// Number of resource types.
    pub const COUNT: usize = 5;

    /// Every resource type, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Iron,
        Self::Nickel,
        Self::Cobalt,
        Self::Platinum,
        Self::Ice,
    ];

    /// Slot of this resource inside an [`Inventory`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Iron => "Iron",
            Self::Nickel => "Nickel",
            Self::Cobalt => "Cobalt",
            Self::Platinum => "Platinum",
            Self::Ice => "Ice",
        }
    }
}

/// A bounded cargo hold.
///
/// `capacity` limits the sum over all resource types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: [u32; ResourceType::COUNT],
    capacity: u32,
}

impl Inventory {
    /// Creates an empty hold.
    #[must_use]
    pub const fn with_capacity(capacity: u32) -> Self {
        Self {
            counts: [0; ResourceType::COUNT],
            capacity,
        }
    }

    /// Maximum total units.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units of one resource type.
    #[inline]
    #[must_use]
    pub const fn count(&self, resource: ResourceType) -> u32 {
        self.counts[resource.index()]
    }

    /// Total units over all types.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Units that still fit.
    #[must_use]
    pub fn free_space(&self) -> u32 {
        self.capacity.saturating_sub(self.total())
    }

    /// Returns true when nothing more fits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free_space() == 0
    }

    /// Returns true when the hold is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Adds up to `amount` units and returns how many fit.
    pub fn add(&mut self, resource: ResourceType, amount: u32) -> u32 {
        let accepted = amount.min(self.free_space());
        self.counts[resource.index()] += accepted;
        accepted
    }

    /// Moves the whole content of `other` in, or nothing at all.
    ///
    /// Returns `false` (and changes nothing) when `other` does not fit.
    pub fn absorb(&mut self, other: &Self) -> bool {
        if other.total() > self.free_space() {
            return false;
        }
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
        true
    }

    /// Empties the hold.
    pub fn clear(&mut self) {
        self.counts = [0; ResourceType::COUNT];
    }

    /// Iterates non-empty `(resource, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, u32)> + '_ {
        ResourceType::ALL
            .iter()
            .map(|&resource| (resource, self.count(resource)))
            .filter(|&(_, count)| count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_clamps_to_capacity() {
        let mut hold = Inventory::with_capacity(100);
        assert_eq!(hold.add(ResourceType::Iron, 60), 60);
        assert_eq!(hold.add(ResourceType::Ice, 60), 40);
        assert!(hold.is_full());
        assert_eq!(hold.add(ResourceType::Iron, 1), 0);
        assert_eq!(hold.total(), 100);
    }

    #[test]
    fn test_absorb_is_all_or_nothing() {
        let mut cargo = Inventory::with_capacity(50);
        cargo.add(ResourceType::Cobalt, 30);

        let mut small = Inventory::with_capacity(20);
        assert!(!small.absorb(&cargo));
        assert!(small.is_empty());

        let mut big = Inventory::with_capacity(1_000);
        big.add(ResourceType::Cobalt, 5);
        assert!(big.absorb(&cargo));
        assert_eq!(big.count(ResourceType::Cobalt), 35);
    }

    #[test]
    fn test_iter_skips_empty_types() {
        let mut hold = Inventory::with_capacity(10);
        hold.add(ResourceType::Platinum, 3);
        let items: Vec<_> = hold.iter().collect();
        assert_eq!(items, vec![(ResourceType::Platinum, 3)]);

        hold.clear();
        assert_eq!(hold.iter().count(), 0);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, resource) in ResourceType::ALL.iter().enumerate() {
            assert_eq!(resource.index(), i);
        }
    }
}
