//! Shared fixtures for the binform integration tests.
//!
//! The object graph mirrors a typical embedding application: a record with
//! primitives, a string, a list, a nested child and a list of children.

#![allow(missing_docs)]
#![allow(clippy::must_use_candidate)]

use std::io;

use binform_serialize::{
    Decoder, Encoder, Override, Result, SelfDescribing, Serializable,
};

// ============================================================================
// Demo Object Graph
// ============================================================================

/// A leaf record.
#[derive(Debug, Clone, Default, PartialEq, Serializable)]
pub struct Child {
    #[serialize(order = 0)]
    pub flag: bool,

    #[serialize(order = 1)]
    pub text: String,
}

impl Child {
    pub fn new(flag: bool, text: &str) -> Self {
        Self { flag, text: text.to_owned() }
    }
}

/// The root record of the demo graph.
#[derive(Debug, Clone, Default, PartialEq, Serializable)]
pub struct Record {
    #[serialize(order = 0)]
    pub flag: bool,

    #[serialize(order = 1)]
    pub number: i32,

    #[serialize(order = 2)]
    pub text: String,

    #[serialize(order = 3)]
    pub ratio: f32,

    #[serialize(order = 4)]
    pub numbers: Vec<i32>,

    #[serialize(order = 5)]
    pub child: Option<Child>,

    #[serialize(order = 6)]
    pub children: Option<Vec<Child>>,

    /// Never serialized.
    pub cache: Vec<u8>,
}

/// A fully populated [`Record`].
pub fn sample_record() -> Record {
    Record {
        flag: true,
        number: 123,
        text: "I am a cool string! Yay!".to_owned(),
        ratio: 2.5,
        numbers: vec![1, 2, 3],
        child: Some(Child::new(true, "Another cool string!")),
        children: Some(vec![
            Child::new(true, "String 3!"),
            Child::new(false, "String 4!"),
        ]),
        cache: vec![0xde, 0xad],
    }
}

// ============================================================================
// Member Order
// ============================================================================

/// Members declared in ascending order.
#[derive(Debug, Default, PartialEq, Serializable)]
pub struct Forward {
    #[serialize(order = 0)]
    pub id: u64,

    #[serialize(order = 1)]
    pub name: String,

    #[serialize(order = 2)]
    pub weight: f64,
}

/// The members of [`Forward`], declared in reverse.
#[derive(Debug, Default, PartialEq, Serializable)]
pub struct Backward {
    #[serialize(order = 2)]
    pub weight: f64,

    #[serialize(order = 1)]
    pub name: String,

    #[serialize(order = 0)]
    pub id: u64,
}

// ============================================================================
// Properties
// ============================================================================

/// A record whose area is exposed only through accessors.
#[derive(Debug, Default, PartialEq, Serializable)]
#[serialize(property(order = 1, ty = u32, get = area, set = set_area))]
#[serialize(property(order = 2, ty = String, get = summary))]
pub struct Plot {
    #[serialize(order = 0)]
    pub owner: String,

    area: u32,
}

impl Plot {
    pub fn new(owner: &str, area: u32) -> Self {
        Self { owner: owner.to_owned(), area }
    }

    pub fn area(&self) -> u32 { self.area }

    pub fn set_area(&mut self, area: u32) { self.area = area; }

    /// Read-only: never serialized.
    pub fn summary(&self) -> String { format!("{} ({})", self.owner, self.area) }
}

// ============================================================================
// Overrides
// ============================================================================

/// A temperature in degrees Celsius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serializable)]
#[serialize(value_type)]
pub struct Celsius {
    #[serialize(order = 0)]
    pub degrees: f64,
}

/// Stores a [`Celsius`] as tenths of a degree in an `i16`.
#[derive(Debug, Default)]
pub struct Tenths;

impl Override<Celsius> for Tenths {
    #[allow(clippy::cast_possible_truncation)]
    fn encode(&self, value: &Celsius, encoder: &mut dyn Encoder) -> Result<()> {
        let tenths = (value.degrees * 10.0).round();
        if !(f64::from(i16::MIN)..=f64::from(i16::MAX)).contains(&tenths) {
            return Err(binform_serialize::Error::override_failed::<Celsius>(
                format!("{} degrees does not fit in tenths", value.degrees),
            ));
        }

        encoder.emit_i16(tenths as i16)
    }

    fn decode(&self, decoder: &mut dyn Decoder) -> Result<Celsius> {
        Ok(Celsius { degrees: f64::from(decoder.read_i16()?) / 10.0 })
    }
}

/// A reading that nests the overridden type.
#[derive(Debug, Default, PartialEq, Serializable)]
pub struct Reading {
    #[serialize(order = 0)]
    pub station: String,

    #[serialize(order = 1)]
    pub temperature: Celsius,

    #[serialize(order = 2)]
    pub history: Vec<Celsius>,
}

// ============================================================================
// Self-describing
// ============================================================================

/// A color packed into three bytes, written in `#rrggbb` form as a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serializable)]
#[serialize(self_describing)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl SelfDescribing for Rgb {
    fn encode_self<E: Encoder + ?Sized>(&self, encoder: &mut E) -> Result<()> {
        encoder.emit_str(&format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2))
    }

    fn decode_self<D: Decoder + ?Sized>(decoder: &mut D) -> Result<Self> {
        let text = decoder.read_str()?;
        let channel = |range: std::ops::Range<usize>| {
            text.get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("`{text}` is not a #rrggbb color"),
                    )
                })
        };

        Ok(Self(channel(1..3)?, channel(3..5)?, channel(5..7)?))
    }
}

/// A palette mixing self-describing and ordinary members.
#[derive(Debug, Default, PartialEq, Serializable)]
pub struct Palette {
    #[serialize(order = 0)]
    pub name: String,

    #[serialize(order = 1)]
    pub colors: Vec<Rgb>,

    #[serialize(order = 2)]
    pub accent: Option<Rgb>,
}

// ============================================================================
// Opaque
// ============================================================================

/// A runtime-only handle that is not marked serializable.
#[derive(Debug, PartialEq, Serializable)]
#[serialize(opaque)]
pub struct Connection {
    pub port: u16,
}

impl Default for Connection {
    fn default() -> Self { Self { port: 8080 } }
}

/// A record that embeds a [`Connection`].
#[derive(Debug, Default, PartialEq, Serializable)]
pub struct Login {
    #[serialize(order = 0)]
    pub user: String,

    #[serialize(order = 1)]
    pub connection: Connection,

    #[serialize(order = 2)]
    pub retries: u8,
}
