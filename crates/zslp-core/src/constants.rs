//! Protocol constants. All native values in satoshis.

/// Minimum output value the network relays. Change below this is foregone.
pub const DUST_LIMIT: u64 = 546;

/// Policy ceiling on inputs per token-layer transaction.
pub const MAX_TOKEN_INPUTS: usize = 24;

/// Four-byte token-layer protocol identifier (`"SLP\0"`).
pub const LOKAD_ID: [u8; 4] = [0x53, 0x4c, 0x50, 0x00];

/// The only token type this wallet understands.
pub const TOKEN_TYPE_1: u64 = 1;

/// Serialized size of a signed P2PKH input with a compressed key.
pub const P2PKH_INPUT_BYTES: u64 = 148;

/// Serialized size of a P2PKH output.
pub const P2PKH_OUTPUT_BYTES: u64 = 34;

/// Version, lock time and input/output count varints.
pub const TX_OVERHEAD_BYTES: u64 = 10;

/// Extra bytes charged for a zero-value `OP_RETURN` output beyond its script.
pub const OP_RETURN_OVERHEAD_BYTES: u64 = 10;

/// Script opcodes used by the codec.
pub mod opcodes {
    pub const OP_0: u8 = 0x00;
    pub const OP_PUSHDATA1: u8 = 0x4c;
    pub const OP_PUSHDATA2: u8 = 0x4d;
    pub const OP_PUSHDATA4: u8 = 0x4e;
    pub const OP_1NEGATE: u8 = 0x4f;
    pub const OP_1: u8 = 0x51;
    pub const OP_16: u8 = 0x60;
    pub const OP_RETURN: u8 = 0x6a;
}

/// Base58Check version byte of a mainnet private key.
pub const WIF_VERSION: u8 = 0x80;

/// Suffix marking a WIF as belonging to a compressed public key.
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;
