//! Shader-resource binding decode.
//!
//! A node's binding-data map associates arbitrary keys with values; integer
//! values are interpreted as encoded addresses whose bank selects the access
//! kind and whose offset selects the render target.

/// Bank bases for encoded binding addresses.
pub const READ_BINDING_BASE: u64 = 0x10000;
pub const WRITE_BINDING_BASE: u64 = 0x20000;
pub const READ_WRITE_BINDING_BASE: u64 = 0x30000;
const BINDING_BANK_SIZE: u64 = 0x10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Read,
    Write,
    ReadWrite,
}

impl BindingKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Read => "input",
            Self::Write => "output",
            Self::ReadWrite => "input_output",
        }
    }

    pub fn writes(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// Decodes an encoded address into (access kind, render-target index), or
/// None when the address falls outside all three banks.
pub fn decode_address(address: u64) -> Option<(BindingKind, u32)> {
    let kind = match address {
        a if (READ_BINDING_BASE..WRITE_BINDING_BASE).contains(&a) => BindingKind::Read,
        a if (WRITE_BINDING_BASE..READ_WRITE_BINDING_BASE).contains(&a) => BindingKind::Write,
        a if (READ_WRITE_BINDING_BASE..READ_WRITE_BINDING_BASE + BINDING_BANK_SIZE)
            .contains(&a) =>
        {
            BindingKind::ReadWrite
        }
        _ => return None,
    };
    Some((kind, (address % BINDING_BANK_SIZE) as u32))
}

/// Decodes a binding-map value. Non-integer payloads carry no address and are
/// ignored.
pub fn decode_binding_value(value: &serde_json::Value) -> Option<(BindingKind, u32)> {
    value.as_u64().and_then(decode_address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bank_boundaries() {
        assert_eq!(decode_address(0xFFFF), None);
        assert_eq!(decode_address(0x10000), Some((BindingKind::Read, 0)));
        assert_eq!(decode_address(0x1FFFF), Some((BindingKind::Read, 0xFFFF)));
        assert_eq!(decode_address(0x20000), Some((BindingKind::Write, 0)));
        assert_eq!(
            decode_address(0x3ABCD),
            Some((BindingKind::ReadWrite, 0xABCD))
        );
        assert_eq!(decode_address(0x40000), None);
    }

    #[test]
    fn non_integer_payloads_decode_to_nothing() {
        assert_eq!(decode_binding_value(&json!("texture")), None);
        assert_eq!(decode_binding_value(&json!(1.5)), None);
        assert_eq!(decode_binding_value(&json!(-3)), None);
        assert_eq!(decode_binding_value(&json!(null)), None);
        assert_eq!(
            decode_binding_value(&json!(0x20007)),
            Some((BindingKind::Write, 7))
        );
    }
}
