//! Minimal script chunk parser and push encoder.
//!
//! Only what the token layer needs: an `OP_RETURN` marker followed by data
//! pushes. Small-integer opcodes (`OP_0`, `OP_1`..`OP_16`) and literal byte
//! pushes are kept distinct in [`ScriptField`] and normalised by
//! [`ScriptField::as_u64`].

use crate::constants::opcodes::*;
use crate::error::ScriptError;

/// One element of a parsed script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptField {
    /// Bytes pushed by a direct push or `OP_PUSHDATA{1,2,4}`.
    Literal(Vec<u8>),
    /// Value of `OP_0` or `OP_1`..`OP_16`.
    SmallInt(u8),
    /// Any other opcode.
    Opcode(u8),
}

impl ScriptField {
    /// Numeric value of the field.
    ///
    /// Literals are read as unsigned big-endian integers of at most 8 bytes;
    /// an empty literal has no value.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::SmallInt(n) => Some(u64::from(*n)),
            Self::Literal(bytes) if !bytes.is_empty() && bytes.len() <= 8 => {
                Some(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
            }
            _ => None,
        }
    }

    /// Pushed bytes. Small integers yield their single-byte form.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Literal(bytes) => Some(bytes.clone()),
            Self::SmallInt(0) => Some(Vec::new()),
            Self::SmallInt(n) => Some(vec![*n]),
            Self::Opcode(_) => None,
        }
    }

    /// True if this is the given non-push opcode.
    pub fn is_opcode(&self, op: u8) -> bool {
        matches!(self, Self::Opcode(o) if *o == op)
    }
}

/// Split a raw script into fields.
pub fn parse_script(script: &[u8]) -> Result<Vec<ScriptField>, ScriptError> {
    let mut fields = Vec::new();
    let mut pos = 0usize;

    while pos < script.len() {
        let op = script[pos];
        pos += 1;

        let push_len = match op {
            OP_0 => {
                fields.push(ScriptField::SmallInt(0));
                continue;
            }
            0x01..=0x4b => usize::from(op),
            OP_PUSHDATA1 => read_len(script, &mut pos, 1)?,
            OP_PUSHDATA2 => read_len(script, &mut pos, 2)?,
            OP_PUSHDATA4 => read_len(script, &mut pos, 4)?,
            OP_1..=OP_16 => {
                fields.push(ScriptField::SmallInt(op - OP_1 + 1));
                continue;
            }
            _ => {
                fields.push(ScriptField::Opcode(op));
                continue;
            }
        };

        let end = pos
            .checked_add(push_len)
            .filter(|end| *end <= script.len())
            .ok_or_else(|| {
                ScriptError::Malformed(format!("push of {push_len} bytes overruns script"))
            })?;
        fields.push(ScriptField::Literal(script[pos..end].to_vec()));
        pos = end;
    }

    Ok(fields)
}

/// Read a little-endian length prefix of `width` bytes.
fn read_len(script: &[u8], pos: &mut usize, width: usize) -> Result<usize, ScriptError> {
    let end = *pos + width;
    let bytes = script
        .get(*pos..end)
        .ok_or_else(|| ScriptError::Malformed("truncated push length".into()))?;
    *pos = end;
    Ok(bytes
        .iter()
        .rev()
        .fold(0usize, |acc, b| (acc << 8) | usize::from(*b)))
}

/// Append a data push to `script`.
///
/// Empty data is written as `OP_PUSHDATA1 0x00` so every field occupies a
/// push, which the token layer requires.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    match len {
        0 => script.extend_from_slice(&[OP_PUSHDATA1, 0]),
        1..=0x4b => script.push(len as u8),
        0x4c..=0xff => script.extend_from_slice(&[OP_PUSHDATA1, len as u8]),
        0x100..=0xffff => {
            script.push(OP_PUSHDATA2);
            script.extend_from_slice(&(len as u16).to_le_bytes());
        }
        _ => {
            script.push(OP_PUSHDATA4);
            script.extend_from_slice(&(len as u32).to_le_bytes());
        }
    }
    script.extend_from_slice(data);
}

/// Build an `OP_RETURN` script pushing each chunk in order.
pub fn encode_op_return<T: AsRef<[u8]>>(chunks: &[T]) -> Vec<u8> {
    let mut script = vec![OP_RETURN];
    for chunk in chunks {
        push_data(&mut script, chunk.as_ref());
    }
    script
}

/// A caller-supplied `OP_RETURN` chunk.
///
/// Text starting with `0x` is hex; anything else is taken as UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadChunk(pub Vec<u8>);

impl PayloadChunk {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        match text.strip_prefix("0x") {
            Some(hex_part) => hex::decode(hex_part)
                .map(Self)
                .map_err(|e| ScriptError::Malformed(format!("bad hex chunk: {e}"))),
            None => Ok(Self(text.as_bytes().to_vec())),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}
