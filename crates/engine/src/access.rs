use std::collections::HashSet;

use gasless_swap_types::Address;

use crate::SwapError;

/// Owner plus the maintainers it has allowlisted. No expiry.
#[derive(Debug, Clone)]
pub struct AccessRegistry {
    owner: Address,
    maintainers: HashSet<Address>,
}

impl AccessRegistry {
    pub fn new(owner: Address) -> Result<Self, SwapError> {
        if owner.is_zero() {
            return Err(SwapError::ZeroOwner);
        }

        Ok(Self {
            owner,
            maintainers: HashSet::new(),
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn ensure_owner(&self, caller: Address) -> Result<(), SwapError> {
        if caller != self.owner {
            return Err(SwapError::CallerNotOwner(caller));
        }
        Ok(())
    }

    pub fn ensure_maintainer(&self, caller: Address) -> Result<(), SwapError> {
        if !self.is_maintainer(caller) {
            return Err(SwapError::CallerNotMaintainer(caller));
        }
        Ok(())
    }

    pub fn is_maintainer(&self, account: Address) -> bool {
        self.maintainers.contains(&account)
    }

    /// Idempotent; returns whether membership changed
    pub fn set_maintainer(&mut self, maintainer: Address, enabled: bool) -> Result<bool, SwapError> {
        if maintainer.is_zero() {
            return Err(SwapError::ZeroMaintainer);
        }

        Ok(if enabled {
            self.maintainers.insert(maintainer)
        } else {
            self.maintainers.remove(&maintainer)
        })
    }

    pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<Address, SwapError> {
        if new_owner.is_zero() {
            return Err(SwapError::ZeroOwner);
        }
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::repeat_byte(0x01)
    }

    fn maintainer() -> Address {
        Address::repeat_byte(0x02)
    }

    #[test]
    fn test_zero_owner_rejected() {
        assert_eq!(AccessRegistry::new(Address::ZERO).unwrap_err(), SwapError::ZeroOwner);
    }

    #[test]
    fn test_set_maintainer_is_idempotent() {
        let mut registry = AccessRegistry::new(owner()).unwrap();

        assert!(registry.set_maintainer(maintainer(), true).unwrap());
        assert!(!registry.set_maintainer(maintainer(), true).unwrap());
        assert!(registry.is_maintainer(maintainer()));

        assert!(registry.set_maintainer(maintainer(), false).unwrap());
        assert!(!registry.set_maintainer(maintainer(), false).unwrap());
        assert!(!registry.is_maintainer(maintainer()));
    }

    #[test]
    fn test_revoked_maintainer_rejected() {
        let mut registry = AccessRegistry::new(owner()).unwrap();
        registry.set_maintainer(maintainer(), true).unwrap();
        assert!(registry.ensure_maintainer(maintainer()).is_ok());

        registry.set_maintainer(maintainer(), false).unwrap();
        assert_eq!(
            registry.ensure_maintainer(maintainer()),
            Err(SwapError::CallerNotMaintainer(maintainer()))
        );
    }

    #[test]
    fn test_owner_is_not_implicitly_maintainer() {
        let registry = AccessRegistry::new(owner()).unwrap();
        assert!(registry.ensure_owner(owner()).is_ok());
        assert!(registry.ensure_maintainer(owner()).is_err());
    }

    #[test]
    fn test_zero_maintainer_rejected() {
        let mut registry = AccessRegistry::new(owner()).unwrap();
        assert_eq!(
            registry.set_maintainer(Address::ZERO, true),
            Err(SwapError::ZeroMaintainer)
        );
    }

    #[test]
    fn test_transfer_ownership() {
        let mut registry = AccessRegistry::new(owner()).unwrap();
        let previous = registry.transfer_ownership(maintainer()).unwrap();

        assert_eq!(previous, owner());
        assert_eq!(registry.owner(), maintainer());
        assert!(registry.ensure_owner(owner()).is_err());
        assert_eq!(registry.transfer_ownership(Address::ZERO), Err(SwapError::ZeroOwner));
    }
}
