use solana_program::pubkey::Pubkey;

/// One whole native unit (18 decimals)
pub const ONE: u128 = 1_000_000_000_000_000_000;

/// Wrapped native sorting after every launched token: launched token is token0
pub const WRAPPED_HIGH: Pubkey = Pubkey::new_from_array([0xfe; 32]);

/// Wrapped native sorting before every launched token: wrapped native is token0
pub const WRAPPED_LOW: Pubkey = Pubkey::new_from_array([0x01; 32]);

pub const FACTORY: Pubkey = Pubkey::new_from_array([0x30; 32]);
pub const OWNER: Pubkey = Pubkey::new_from_array([0x31; 32]);
pub const BONDED_MANAGER: Pubkey = Pubkey::new_from_array([0x32; 32]);
pub const PUBLIC_MANAGER: Pubkey = Pubkey::new_from_array([0x33; 32]);
pub const BONDED_ROUTER: Pubkey = Pubkey::new_from_array([0x34; 32]);
pub const PUBLIC_ROUTER: Pubkey = Pubkey::new_from_array([0x35; 32]);

/// Rounding slack allowed when comparing migrated amounts
pub const DUST_TOLERANCE: u128 = 5;
