use super::*;
use crate::{ByteOrder, Decimal, LengthField};

fn little() -> Config { Config::default() }

fn big() -> Config { Config::builder().byte_order(ByteOrder::Big).build() }

fn encoded(config: Config, f: impl FnOnce(&mut BinaryEncoder<Vec<u8>>)) -> Vec<u8> {
    let mut encoder = BinaryEncoder::new(Vec::new(), config);
    f(&mut encoder);
    encoder.into_inner()
}

#[test]
fn integer_boundaries_roundtrip() {
    let bytes = encoded(little(), |e| {
        e.emit_u8(u8::MAX).unwrap();
        e.emit_i8(i8::MIN).unwrap();
        e.emit_u16(u16::MAX).unwrap();
        e.emit_i16(i16::MIN).unwrap();
        e.emit_u32(u32::MAX).unwrap();
        e.emit_i32(i32::MIN).unwrap();
        e.emit_u64(u64::MAX).unwrap();
        e.emit_i64(i64::MIN).unwrap();
    });
    assert_eq!(bytes.len(), 1 + 1 + 2 + 2 + 4 + 4 + 8 + 8);

    let mut decoder = BinaryDecoder::new(&bytes[..], little());
    assert_eq!(decoder.read_u8().unwrap(), u8::MAX);
    assert_eq!(decoder.read_i8().unwrap(), i8::MIN);
    assert_eq!(decoder.read_u16().unwrap(), u16::MAX);
    assert_eq!(decoder.read_i16().unwrap(), i16::MIN);
    assert_eq!(decoder.read_u32().unwrap(), u32::MAX);
    assert_eq!(decoder.read_i32().unwrap(), i32::MIN);
    assert_eq!(decoder.read_u64().unwrap(), u64::MAX);
    assert_eq!(decoder.read_i64().unwrap(), i64::MIN);
    assert!(decoder.get_ref().is_empty());
}

#[test]
fn floats_are_bit_exact() {
    let values = [0.0f64, -0.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, f64::MIN_POSITIVE];

    for value in values {
        let bytes = encoded(little(), |e| e.emit_f64(value).unwrap());
        let mut decoder = BinaryDecoder::new(&bytes[..], little());
        assert_eq!(decoder.read_f64().unwrap().to_bits(), value.to_bits());
    }

    let bytes = encoded(big(), |e| e.emit_f32(f32::NAN).unwrap());
    let mut decoder = BinaryDecoder::new(&bytes[..], big());
    assert_eq!(decoder.read_f32().unwrap().to_bits(), f32::NAN.to_bits());
}

#[test]
fn little_endian_layout() {
    let bytes = encoded(little(), |e| e.emit_u32(0x0102_0304).unwrap());
    assert_eq!(bytes, [0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn big_endian_reverses_every_multibyte_field() {
    let write = |e: &mut BinaryEncoder<Vec<u8>>| {
        e.emit_u16(0x0102).unwrap();
        e.emit_i64(-2).unwrap();
        e.emit_str("ab").unwrap();
    };
    let le = encoded(little(), write);
    let be = encoded(big(), write);

    assert_eq!(&le[0..2], [0x02, 0x01]);
    assert_eq!(&be[0..2], [0x01, 0x02]);

    let mut reversed = le[2..10].to_vec();
    reversed.reverse();
    assert_eq!(reversed, &be[2..10]);

    assert_eq!(&le[10..14], [2, 0, 0, 0]);
    assert_eq!(&be[10..14], [0, 0, 0, 2]);
    assert_eq!(&le[14..], b"ab");
    assert_eq!(&be[14..], b"ab");
}

#[test]
fn mismatched_byte_order_is_deterministic() {
    let bytes = encoded(little(), |e| e.emit_u32(1).unwrap());

    let mut decoder = BinaryDecoder::new(&bytes[..], big());
    assert_eq!(decoder.read_u32().unwrap(), 0x0100_0000);
}

#[test]
fn bool_only_one_is_true() {
    let mut decoder = BinaryDecoder::new(&[1u8, 0, 2][..], little());
    assert!(decoder.read_bool().unwrap());
    assert!(!decoder.read_bool().unwrap());
    assert!(!decoder.read_bool().unwrap());
}

#[test]
fn presence_nonzero_is_present() {
    let bytes = encoded(little(), |e| {
        e.emit_presence(true).unwrap();
        e.emit_presence(false).unwrap();
    });
    assert_eq!(bytes, [1, 0]);

    let mut decoder = BinaryDecoder::new(&[7u8, 0][..], little());
    assert!(decoder.read_presence().unwrap());
    assert!(!decoder.read_presence().unwrap());
}

#[test]
fn string_is_length_prefixed_utf8() {
    let bytes = encoded(little(), |e| e.emit_str("héllo").unwrap());
    assert_eq!(&bytes[..4], [6, 0, 0, 0]);
    assert_eq!(&bytes[4..], "héllo".as_bytes());

    let mut decoder = BinaryDecoder::new(&bytes[..], little());
    assert_eq!(decoder.read_str().unwrap(), "héllo");
}

#[test]
fn invalid_utf8_is_rejected() {
    let mut decoder = BinaryDecoder::new(&[2u8, 0, 0, 0, 0xff, 0xfe][..], little());
    assert!(matches!(decoder.read_str(), Err(Error::InvalidUtf8(_))));
}

#[test]
fn truncated_fixed_width_value() {
    let mut decoder = BinaryDecoder::new(&[1u8, 2][..], little());
    assert!(matches!(
        decoder.read_u32(),
        Err(Error::TruncatedStream { needed: 4, read: 2 })
    ));
}

#[test]
fn truncated_string_payload() {
    let mut decoder =
        BinaryDecoder::new(&[5u8, 0, 0, 0, b'a', b'b'][..], little());
    assert!(matches!(
        decoder.read_str(),
        Err(Error::TruncatedStream { needed: 5, read: 2 })
    ));
}

#[test]
fn huge_declared_length_on_short_stream_is_truncation() {
    let config = Config::builder().max_string_length(u32::MAX).build();
    let len = config.string_limit().to_le_bytes();

    let mut decoder = BinaryDecoder::new(&len[..], config);
    assert!(matches!(
        decoder.read_str(),
        Err(Error::TruncatedStream { read: 0, .. })
    ));
}

#[test]
fn length_over_limit_is_malformed() {
    let config = Config::builder().max_sequence_length(3).build();
    let mut decoder = BinaryDecoder::new(&[4u8, 0, 0, 0][..], config);

    assert!(matches!(
        decoder.read_length(LengthField::Sequence),
        Err(Error::MalformedLength {
            field: LengthField::Sequence,
            length: 4,
            limit: 3,
        })
    ));
}

#[test]
fn negative_length_is_malformed_regardless_of_config() {
    let config = Config::builder().max_string_length(u32::MAX).build();
    let bytes = (-1i32).to_le_bytes();
    let mut decoder = BinaryDecoder::new(&bytes[..], config);

    assert!(matches!(
        decoder.read_length(LengthField::String),
        Err(Error::MalformedLength { length: 0xffff_ffff, .. })
    ));
}

#[test]
fn decimal_travels_as_double() {
    let value = Decimal::new(-1234, 2).unwrap();
    let bytes = encoded(little(), |e| e.emit_decimal(value).unwrap());
    assert_eq!(bytes, (-12.34f64).to_le_bytes());

    let mut decoder = BinaryDecoder::new(&bytes[..], little());
    assert_eq!(decoder.read_decimal().unwrap(), value);
}

#[test]
fn non_finite_decimal_is_rejected() {
    let bytes = f64::NAN.to_le_bytes();
    let mut decoder = BinaryDecoder::new(&bytes[..], little());
    assert!(matches!(decoder.read_decimal(), Err(Error::DecimalOutOfRange(_))));
}

#[test]
fn dyn_encoder_forwards() {
    let mut encoder = BinaryEncoder::new(Vec::new(), big());
    {
        let sink: &mut dyn Encoder = &mut encoder;
        sink.emit_u16(0xabcd).unwrap();
    }
    assert_eq!(encoder.get_ref(), &[0xab, 0xcd]);
}

/// Writes strings as a marker byte followed by their upper-cased form.
struct Shouting(Vec<u8>);

impl Encoder for Shouting {
    fn byte_order(&self) -> ByteOrder { ByteOrder::Little }

    fn emit_raw_bytes(&mut self, bytes: &[u8]) -> crate::Result<()> {
        self.0.extend_from_slice(bytes);
        Ok(())
    }

    fn emit_str(&mut self, v: &str) -> crate::Result<()> {
        self.emit_u8(b'!')?;
        self.emit_raw_bytes(v.to_uppercase().as_bytes())
    }
}

#[test]
fn reborrowed_encoder_keeps_custom_methods() {
    let mut encoder = Shouting(Vec::new());
    {
        let mut inner = &mut encoder;
        let sink: &mut dyn Encoder = &mut inner;
        sink.emit_str("hey").unwrap();
    }
    assert_eq!(encoder.0, b"!HEY");
}

#[test]
fn reborrowed_decoder_reads_through() {
    let bytes = encoded(big(), |e| {
        e.emit_str("ok").unwrap();
        e.emit_presence(false).unwrap();
    });

    let mut decoder = BinaryDecoder::new(&bytes[..], big());
    let mut inner = &mut decoder;
    let source: &mut dyn Decoder = &mut inner;
    assert_eq!(source.read_str().unwrap(), "ok");
    assert!(!source.read_presence().unwrap());
}
