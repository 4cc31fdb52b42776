//! [`Serialize`] implementations for the fixed-width primitives and strings.

use crate::{
    decimal::Decimal,
    decode::Decoder,
    encode::Encoder,
    error::Result,
    session::Session,
    value::{Kind, PrimitiveKind, Serialize},
};

/// Implements [`Serialize`] for a primitive by forwarding to the matching
/// `emit_*` / `read_*` pair.
macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident, $emit:ident, $read:ident;)*) => {
        $(
            impl Serialize for $ty {
                const KIND: Kind = Kind::Primitive(PrimitiveKind::$kind);

                fn encode<E: Encoder + ?Sized>(
                    &self,
                    encoder: &mut E,
                    _: &Session<'_>,
                ) -> Result<()> {
                    encoder.$emit(*self)
                }

                fn decode<D: Decoder + ?Sized>(
                    decoder: &mut D,
                    _: &Session<'_>,
                ) -> Result<Self> {
                    decoder.$read()
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool, emit_bool, read_bool;
    u8 => U8, emit_u8, read_u8;
    i8 => I8, emit_i8, read_i8;
    u16 => U16, emit_u16, read_u16;
    i16 => I16, emit_i16, read_i16;
    u32 => U32, emit_u32, read_u32;
    i32 => I32, emit_i32, read_i32;
    u64 => U64, emit_u64, read_u64;
    i64 => I64, emit_i64, read_i64;
    f32 => F32, emit_f32, read_f32;
    f64 => F64, emit_f64, read_f64;
    Decimal => Decimal, emit_decimal, read_decimal;
}

impl Serialize for String {
    const KIND: Kind = Kind::String;

    fn encode<E: Encoder + ?Sized>(
        &self,
        encoder: &mut E,
        _: &Session<'_>,
    ) -> Result<()> {
        encoder.emit_str(self)
    }

    fn decode<D: Decoder + ?Sized>(
        decoder: &mut D,
        _: &Session<'_>,
    ) -> Result<Self> {
        decoder.read_str()
    }
}
