//! Address presence set
//!
//! One bit per 7-bit I2C address, stored as four 32-bit banks.

/// Number of addressable slots (7-bit address space)
pub const ADDRESS_COUNT: usize = 128;

const BANK_COUNT: usize = ADDRESS_COUNT / 32;

/// Which addresses acknowledged during a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressPresenceSet {
    banks: [u32; BANK_COUNT],
}

impl AddressPresenceSet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self {
            banks: [0; BANK_COUNT],
        }
    }

    /// Mark an address as present
    ///
    /// Addresses outside the 7-bit range are ignored.
    pub fn insert(&mut self, address: u8) {
        if (address as usize) < ADDRESS_COUNT {
            let (bank, mask) = Self::locate(address);
            self.banks[bank] |= mask;
        }
    }

    /// Check whether an address is present
    pub fn contains(&self, address: u8) -> bool {
        if (address as usize) >= ADDRESS_COUNT {
            return false;
        }
        let (bank, mask) = Self::locate(address);
        self.banks[bank] & mask != 0
    }

    /// True if no address responded
    pub fn is_empty(&self) -> bool {
        self.banks.iter().all(|&b| b == 0)
    }

    /// Number of responding addresses
    pub fn len(&self) -> usize {
        self.banks.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Present addresses in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..ADDRESS_COUNT as u8).filter(move |&a| self.contains(a))
    }

    /// Raw bank words (bank `n` holds addresses `32n..32n+31`)
    pub fn banks(&self) -> &[u32; BANK_COUNT] {
        &self.banks
    }

    fn locate(address: u8) -> (usize, u32) {
        let index = address as usize;
        (index / 32, 1 << (index % 32))
    }
}

impl FromIterator<u8> for AddressPresenceSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        for address in iter {
            set.insert(address);
        }
        set
    }
}
