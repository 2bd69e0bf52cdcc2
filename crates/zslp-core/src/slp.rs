//! Token-layer (SLP type 1) `OP_RETURN` codec.
//!
//! Field layout after the `OP_RETURN` marker:
//!
//! | idx | genesis        | mint         | send            |
//! |-----|----------------|--------------|-----------------|
//! | 1   | lokad id       | lokad id     | lokad id        |
//! | 2   | token type     | token type   | token type      |
//! | 3   | `GENESIS`      | `MINT`       | `SEND`          |
//! | 4   | ticker         | token id     | token id        |
//! | 5   | name           | baton vout   | qty for vout 1  |
//! | 6   | document url   | quantity     | qty for vout 2… |
//! | 7   | document hash  |              |                 |
//! | 8   | decimals       |              |                 |
//! | 9   | baton vout     |              |                 |
//! | 10  | quantity       |              |                 |

use crate::constants::opcodes::OP_RETURN;
use crate::constants::{LOKAD_ID, TOKEN_TYPE_1};
use crate::error::ScriptError;
use crate::script::{parse_script, push_data, ScriptField};
use crate::types::{Hash256, TokenMetadata, TokenProtocol};

/// Maximum quantities a send may carry (outputs 1..=19).
pub const MAX_SEND_OUTPUTS: usize = 19;

const GENESIS_TICKER: usize = 4;
const GENESIS_NAME: usize = 5;
const GENESIS_DECIMALS: usize = 8;
const GENESIS_BATON: usize = 9;
const GENESIS_QUANTITY: usize = 10;
const MINT_TOKEN_ID: usize = 4;
const MINT_BATON: usize = 5;
const MINT_QUANTITY: usize = 6;
const SEND_TOKEN_ID: usize = 4;
/// Field holding the quantity of output 0; output `i` lives at `SEND_QTY_BASE + i`.
const SEND_QTY_BASE: usize = 4;

/// Transaction kind declared by a token script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenTxType {
    Genesis,
    Mint,
    Send,
}

/// Token data carried by one transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOutput {
    pub token_id: Hash256,
    /// Base units; zero for a minting baton.
    pub quantity: u64,
    pub is_minting_baton: bool,
}

/// A classified token-layer script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenScript {
    tx_type: TokenTxType,
    fields: Vec<ScriptField>,
}

impl TokenScript {
    /// Parse and classify a raw `OP_RETURN` script.
    pub fn parse(script: &[u8]) -> Result<Self, ScriptError> {
        let fields = parse_script(script)?;

        if !fields.first().is_some_and(|f| f.is_opcode(OP_RETURN)) {
            return Err(ScriptError::NotOpReturn);
        }
        match fields.get(1) {
            Some(ScriptField::Literal(id)) if id.as_slice() == LOKAD_ID => {}
            _ => return Err(ScriptError::NotTokenProtocol),
        }
        if fields.get(2).and_then(ScriptField::as_u64) != Some(TOKEN_TYPE_1) {
            return Err(ScriptError::UnknownTokenVersion);
        }

        let tag = fields
            .get(3)
            .and_then(ScriptField::bytes)
            .map(|b| String::from_utf8_lossy(&b).to_ascii_lowercase())
            .ok_or_else(|| ScriptError::InvalidTxType("missing".into()))?;
        let tx_type = match tag.as_str() {
            "genesis" => TokenTxType::Genesis,
            "mint" => TokenTxType::Mint,
            "send" => TokenTxType::Send,
            other => return Err(ScriptError::InvalidTxType(other.to_string())),
        };

        Ok(Self { tx_type, fields })
    }

    pub fn tx_type(&self) -> TokenTxType {
        self.tx_type
    }

    /// Number of fields including the `OP_RETURN` marker.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Token data for output `output_index` of the transaction `txid`
    /// whose first output is this script.
    pub fn decode_output(&self, txid: &Hash256, output_index: u32) -> Result<TokenOutput, ScriptError> {
        let vout = u64::from(output_index);
        match self.tx_type {
            TokenTxType::Genesis => {
                if self.baton_vout(GENESIS_BATON) == Some(vout) {
                    return Ok(TokenOutput {
                        token_id: *txid,
                        quantity: 0,
                        is_minting_baton: true,
                    });
                }
                if output_index != 1 {
                    return Err(ScriptError::NotTokenOutput(output_index));
                }
                Ok(TokenOutput {
                    token_id: *txid,
                    quantity: self.number(GENESIS_QUANTITY)?,
                    is_minting_baton: false,
                })
            }
            TokenTxType::Mint => {
                let token_id = self.token_id(MINT_TOKEN_ID)?;
                if self.baton_vout(MINT_BATON) == Some(vout) {
                    return Ok(TokenOutput {
                        token_id,
                        quantity: 0,
                        is_minting_baton: true,
                    });
                }
                if output_index != 1 {
                    return Err(ScriptError::NotTokenOutput(output_index));
                }
                Ok(TokenOutput {
                    token_id,
                    quantity: self.number(MINT_QUANTITY)?,
                    is_minting_baton: false,
                })
            }
            TokenTxType::Send => {
                let idx = SEND_QTY_BASE + output_index as usize;
                if output_index == 0 || self.fields.len() <= idx {
                    return Err(ScriptError::NotTokenOutput(output_index));
                }
                Ok(TokenOutput {
                    token_id: self.token_id(SEND_TOKEN_ID)?,
                    quantity: self.number(idx)?,
                    is_minting_baton: false,
                })
            }
        }
    }

    /// Metadata of a genesis script; `txid` is the genesis transaction id.
    pub fn genesis_metadata(&self, txid: &Hash256) -> Result<TokenMetadata, ScriptError> {
        if self.tx_type != TokenTxType::Genesis {
            return Err(ScriptError::InvalidTxType(format!("{:?}", self.tx_type).to_lowercase()));
        }
        let decimals = u8::try_from(self.number(GENESIS_DECIMALS)?)
            .map_err(|_| ScriptError::Malformed("decimals out of range".into()))?;

        Ok(TokenMetadata {
            token_id: *txid,
            symbol: self.ascii(GENESIS_TICKER)?,
            name: self.ascii(GENESIS_NAME)?,
            decimals,
            protocol: TokenProtocol::Slp,
        })
    }

    fn field(&self, idx: usize) -> Result<&ScriptField, ScriptError> {
        self.fields
            .get(idx)
            .ok_or_else(|| ScriptError::Malformed(format!("missing field {idx}")))
    }

    fn number(&self, idx: usize) -> Result<u64, ScriptError> {
        self.field(idx)?
            .as_u64()
            .ok_or_else(|| ScriptError::Malformed(format!("field {idx} is not a number")))
    }

    fn baton_vout(&self, idx: usize) -> Option<u64> {
        self.fields.get(idx).and_then(ScriptField::as_u64)
    }

    fn token_id(&self, idx: usize) -> Result<Hash256, ScriptError> {
        self.field(idx)?
            .bytes()
            .and_then(|b| Hash256::from_slice(&b))
            .ok_or_else(|| ScriptError::Malformed(format!("field {idx} is not a token id")))
    }

    fn ascii(&self, idx: usize) -> Result<String, ScriptError> {
        let bytes = self
            .field(idx)?
            .bytes()
            .ok_or_else(|| ScriptError::Malformed(format!("field {idx} is not data")))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Classify a raw script.
pub fn classify(script: &[u8]) -> Result<TokenTxType, ScriptError> {
    TokenScript::parse(script).map(|s| s.tx_type())
}

/// Token data for output `output_index` of `txid`, whose first output is `script`.
pub fn decode_output(txid: &Hash256, script: &[u8], output_index: u32) -> Result<TokenOutput, ScriptError> {
    TokenScript::parse(script)?.decode_output(txid, output_index)
}

/// Metadata of the genesis transaction `txid` with first output `script`.
pub fn decode_genesis_metadata(txid: &Hash256, script: &[u8]) -> Result<TokenMetadata, ScriptError> {
    TokenScript::parse(script)?.genesis_metadata(txid)
}

fn header(tag: &[u8]) -> Vec<u8> {
    let mut script = vec![OP_RETURN];
    push_data(&mut script, &LOKAD_ID);
    push_data(&mut script, &[TOKEN_TYPE_1 as u8]);
    push_data(&mut script, tag);
    script
}

/// Build a send script with one quantity per token output, in output order.
pub fn encode_send_payload(token_id: &Hash256, quantities: &[u64]) -> Result<Vec<u8>, ScriptError> {
    if quantities.is_empty() || quantities.len() > MAX_SEND_OUTPUTS {
        return Err(ScriptError::Malformed(format!(
            "send must carry 1..={MAX_SEND_OUTPUTS} quantities, got {}",
            quantities.len()
        )));
    }
    let mut script = header(b"SEND");
    push_data(&mut script, token_id.as_bytes());
    for qty in quantities {
        push_data(&mut script, &qty.to_be_bytes());
    }
    Ok(script)
}

/// Parameters of a new token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisParams {
    pub symbol: String,
    pub name: String,
    pub document_url: String,
    pub document_hash: Option<[u8; 32]>,
    pub decimals: u8,
    /// Output receiving the minting baton, if any (must be >= 2).
    pub baton_vout: Option<u8>,
    pub initial_quantity: u64,
}

/// Build a genesis script.
pub fn encode_genesis_payload(params: &GenesisParams) -> Vec<u8> {
    let mut script = header(b"GENESIS");
    push_data(&mut script, params.symbol.as_bytes());
    push_data(&mut script, params.name.as_bytes());
    push_data(&mut script, params.document_url.as_bytes());
    push_data(&mut script, params.document_hash.as_ref().map_or(&[][..], |h| &h[..]));
    push_data(&mut script, &[params.decimals]);
    match params.baton_vout {
        Some(vout) => push_data(&mut script, &[vout]),
        None => push_data(&mut script, &[]),
    }
    push_data(&mut script, &params.initial_quantity.to_be_bytes());
    script
}

/// Build a mint script for an existing token.
pub fn encode_mint_payload(token_id: &Hash256, baton_vout: Option<u8>, quantity: u64) -> Vec<u8> {
    let mut script = header(b"MINT");
    push_data(&mut script, token_id.as_bytes());
    match baton_vout {
        Some(vout) => push_data(&mut script, &[vout]),
        None => push_data(&mut script, &[]),
    }
    push_data(&mut script, &quantity.to_be_bytes());
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::opcodes::OP_1;
    use proptest::prelude::*;

    fn token_id() -> Hash256 {
        Hash256([0xab; 32])
    }

    fn genesis_txid() -> Hash256 {
        Hash256([0x11; 32])
    }

    fn genesis(baton: Option<u8>) -> Vec<u8> {
        encode_genesis_payload(&GenesisParams {
            symbol: "WPS".into(),
            name: "Whoopass Stew".into(),
            document_url: String::new(),
            document_hash: None,
            decimals: 2,
            baton_vout: baton,
            initial_quantity: 1_000_000,
        })
    }

    /// Replace the literal version push with the `OP_1` opcode form.
    fn with_op1_version(script: &[u8]) -> Vec<u8> {
        let mut out = script[..6].to_vec();
        out.push(OP_1);
        out.extend_from_slice(&script[8..]);
        out
    }

    #[test]
    fn classify_each_type() {
        assert_eq!(classify(&genesis(None)).unwrap(), TokenTxType::Genesis);
        assert_eq!(
            classify(&encode_mint_payload(&token_id(), Some(2), 5)).unwrap(),
            TokenTxType::Mint
        );
        assert_eq!(
            classify(&encode_send_payload(&token_id(), &[5]).unwrap()).unwrap(),
            TokenTxType::Send
        );
    }

    #[test]
    fn classify_accepts_op1_version() {
        let script = with_op1_version(&encode_send_payload(&token_id(), &[5]).unwrap());
        assert_eq!(classify(&script).unwrap(), TokenTxType::Send);
    }

    #[test]
    fn classify_rejects_non_op_return() {
        assert_eq!(classify(&[0x76, 0xa9]).unwrap_err(), ScriptError::NotOpReturn);
        assert_eq!(classify(&[]).unwrap_err(), ScriptError::NotOpReturn);
    }

    #[test]
    fn classify_rejects_foreign_protocol() {
        let mut script = vec![OP_RETURN];
        push_data(&mut script, b"EXAM");
        assert_eq!(classify(&script).unwrap_err(), ScriptError::NotTokenProtocol);
    }

    #[test]
    fn classify_rejects_unknown_version() {
        let mut script = vec![OP_RETURN];
        push_data(&mut script, &LOKAD_ID);
        push_data(&mut script, &[0x81]);
        push_data(&mut script, b"SEND");
        assert_eq!(classify(&script).unwrap_err(), ScriptError::UnknownTokenVersion);
    }

    #[test]
    fn classify_rejects_unknown_tag() {
        let script = header(b"BURN");
        assert_eq!(
            classify(&script).unwrap_err(),
            ScriptError::InvalidTxType("burn".into())
        );
    }

    #[test]
    fn genesis_token_output() {
        let out = decode_output(&genesis_txid(), &genesis(Some(2)), 1).unwrap();
        assert_eq!(out.token_id, genesis_txid());
        assert_eq!(out.quantity, 1_000_000);
        assert!(!out.is_minting_baton);
    }

    #[test]
    fn genesis_baton_output() {
        let out = decode_output(&genesis_txid(), &genesis(Some(2)), 2).unwrap();
        assert!(out.is_minting_baton);
        assert_eq!(out.quantity, 0);
    }

    #[test]
    fn genesis_baton_as_small_int_opcode() {
        let mut script = genesis(Some(2));
        // baton push `01 02` sits right before the 9-byte quantity push
        let baton_at = script.len() - 9 - 2;
        assert_eq!(&script[baton_at..baton_at + 2], &[0x01, 0x02]);
        script.splice(baton_at..baton_at + 2, [OP_1 + 1]);
        let out = decode_output(&genesis_txid(), &script, 2).unwrap();
        assert!(out.is_minting_baton);
    }

    #[test]
    fn genesis_other_index_is_not_token_output() {
        assert_eq!(
            decode_output(&genesis_txid(), &genesis(None), 3).unwrap_err(),
            ScriptError::NotTokenOutput(3)
        );
    }

    #[test]
    fn mint_uses_embedded_token_id() {
        let script = encode_mint_payload(&token_id(), Some(2), 500);
        let out = decode_output(&Hash256([0x99; 32]), &script, 1).unwrap();
        assert_eq!(out.token_id, token_id());
        assert_eq!(out.quantity, 500);

        let baton = decode_output(&Hash256([0x99; 32]), &script, 2).unwrap();
        assert!(baton.is_minting_baton);
        assert_eq!(baton.token_id, token_id());
    }

    #[test]
    fn mint_other_index_is_not_token_output() {
        let script = encode_mint_payload(&token_id(), None, 500);
        assert_eq!(
            decode_output(&Hash256::ZERO, &script, 2).unwrap_err(),
            ScriptError::NotTokenOutput(2)
        );
    }

    #[test]
    fn send_beyond_quantities_is_not_token_output() {
        let script = encode_send_payload(&token_id(), &[150, 50]).unwrap();
        assert_eq!(
            decode_output(&Hash256::ZERO, &script, 3).unwrap_err(),
            ScriptError::NotTokenOutput(3)
        );
        assert_eq!(
            decode_output(&Hash256::ZERO, &script, 0).unwrap_err(),
            ScriptError::NotTokenOutput(0)
        );
    }

    #[test]
    fn send_payload_rejects_bad_counts() {
        assert!(encode_send_payload(&token_id(), &[]).is_err());
        assert!(encode_send_payload(&token_id(), &[1; 20]).is_err());
    }

    #[test]
    fn metadata_only_for_genesis() {
        let script = encode_send_payload(&token_id(), &[1]).unwrap();
        assert_eq!(
            decode_genesis_metadata(&Hash256::ZERO, &script).unwrap_err(),
            ScriptError::InvalidTxType("send".into())
        );
    }

    #[test]
    fn metadata_decimals_from_literal() {
        let meta = decode_genesis_metadata(&genesis_txid(), &genesis(None)).unwrap();
        assert_eq!(meta.symbol, "WPS");
        assert_eq!(meta.name, "Whoopass Stew");
        assert_eq!(meta.decimals, 2);
        assert_eq!(meta.token_id, genesis_txid());
        assert_eq!(meta.protocol, TokenProtocol::Slp);
    }

    #[test]
    fn metadata_decimals_from_small_int_opcode() {
        let mut script = genesis(None);
        // decimals `01 02`, empty baton `4c 00`, then the 9-byte quantity push
        let decimals_at = script.len() - 9 - 2 - 2;
        assert_eq!(&script[decimals_at..decimals_at + 2], &[0x01, 0x02]);
        script.splice(decimals_at..decimals_at + 2, [OP_1 + 7]);

        let meta = decode_genesis_metadata(&genesis_txid(), &script).unwrap();
        assert_eq!(meta.decimals, 8);
        assert_eq!(meta.symbol, "WPS");
        let out = decode_output(&genesis_txid(), &script, 1).unwrap();
        assert_eq!(out.quantity, 1_000_000);
    }

    #[test]
    fn mint_baton_as_small_int_opcode() {
        let mut script = encode_mint_payload(&token_id(), Some(2), 500);
        let baton_at = script.len() - 9 - 2;
        assert_eq!(&script[baton_at..baton_at + 2], &[0x01, 0x02]);
        script.splice(baton_at..baton_at + 2, [OP_1 + 1]);

        let baton = decode_output(&Hash256::ZERO, &script, 2).unwrap();
        assert!(baton.is_minting_baton);
        assert_eq!(baton.token_id, token_id());
        let minted = decode_output(&Hash256::ZERO, &script, 1).unwrap();
        assert_eq!(minted.quantity, 500);
        assert!(!minted.is_minting_baton);
    }

    #[test]
    fn send_quantity_as_small_int_opcode() {
        let mut script = encode_send_payload(&token_id(), &[150, 5]).unwrap();
        let last_at = script.len() - 9;
        assert_eq!(script[last_at], 0x08);
        script.splice(last_at.., [OP_1 + 4]);

        assert_eq!(decode_output(&Hash256::ZERO, &script, 1).unwrap().quantity, 150);
        let out = decode_output(&Hash256::ZERO, &script, 2).unwrap();
        assert_eq!(out.quantity, 5);
        assert_eq!(out.token_id, token_id());
    }

    proptest! {
        #[test]
        fn send_quantities_roundtrip(qtys in proptest::collection::vec(any::<u64>(), 1..=19)) {
            let script = encode_send_payload(&token_id(), &qtys).unwrap();
            for (i, qty) in qtys.iter().enumerate() {
                let out = decode_output(&Hash256::ZERO, &script, i as u32 + 1).unwrap();
                prop_assert_eq!(out.quantity, *qty);
                prop_assert_eq!(out.token_id, token_id());
            }
        }

        #[test]
        fn genesis_metadata_roundtrip(
            symbol in "[A-Z]{1,8}",
            name in "[A-Za-z ]{0,40}",
            decimals in 0u8..=255,
        ) {
            let script = encode_genesis_payload(&GenesisParams {
                symbol: symbol.clone(),
                name: name.clone(),
                document_url: "https://example.org".into(),
                document_hash: Some([7; 32]),
                decimals,
                baton_vout: None,
                initial_quantity: 1,
            });
            let meta = decode_genesis_metadata(&genesis_txid(), &script).unwrap();
            prop_assert_eq!(meta.symbol, symbol);
            prop_assert_eq!(meta.name, name);
            prop_assert_eq!(meta.decimals, decimals);
        }
    }
}
