use std::fmt;

use serde::{Deserialize, Serialize};

/// Room categories priced by the Decas plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DecasRoomType {
    Double,
    Triple,
    Quadruple,
}

impl DecasRoomType {
    pub fn all() -> &'static [DecasRoomType] {
        &[
            DecasRoomType::Double,
            DecasRoomType::Triple,
            DecasRoomType::Quadruple,
        ]
    }

    /// Column header of this room type in the Decas rate file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Double => "Doble",
            Self::Triple => "Triple",
            Self::Quadruple => "Cuádruple",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "doble" | "double" => Some(Self::Double),
            "triple" => Some(Self::Triple),
            "cuádruple" | "cuadruple" | "quadruple" => Some(Self::Quadruple),
            _ => None,
        }
    }
}

impl fmt::Display for DecasRoomType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of rooms booked per Decas room type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCounts {
    pub double: u32,
    pub triple: u32,
    pub quadruple: u32,
}

impl RoomCounts {
    /// Upper bound of each room counter in the booking form.
    pub const MAX_PER_TYPE: u32 = 10;

    pub fn new(
        double: u32,
        triple: u32,
        quadruple: u32,
    ) -> Self {
        Self {
            double,
            triple,
            quadruple,
        }
    }

    pub fn get(
        &self,
        room_type: DecasRoomType,
    ) -> u32 {
        match room_type {
            DecasRoomType::Double => self.double,
            DecasRoomType::Triple => self.triple,
            DecasRoomType::Quadruple => self.quadruple,
        }
    }

    pub fn set(
        &mut self,
        room_type: DecasRoomType,
        count: u32,
    ) {
        match room_type {
            DecasRoomType::Double => self.double = count,
            DecasRoomType::Triple => self.triple = count,
            DecasRoomType::Quadruple => self.quadruple = count,
        }
    }

    pub fn total(&self) -> u32 {
        self.double + self.triple + self.quadruple
    }

    /// Room types with at least one room booked, in display order.
    pub fn booked(&self) -> impl Iterator<Item = (DecasRoomType, u32)> + '_ {
        DecasRoomType::all()
            .iter()
            .map(|room_type| (*room_type, self.get(*room_type)))
            .filter(|(_, count)| *count > 0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn booked_skips_empty_types_and_keeps_order() {
        let counts = RoomCounts::new(2, 0, 1);

        let booked: Vec<_> = counts.booked().collect();

        assert_eq!(
            booked,
            vec![(DecasRoomType::Double, 2), (DecasRoomType::Quadruple, 1)]
        );
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn set_updates_single_type() {
        let mut counts = RoomCounts::default();

        counts.set(DecasRoomType::Triple, 4);

        assert_eq!(counts, RoomCounts::new(0, 4, 0));
    }

    #[test]
    fn parse_accepts_accented_and_plain_spelling() {
        assert_eq!(
            DecasRoomType::parse("Cuádruple"),
            Some(DecasRoomType::Quadruple)
        );
        assert_eq!(
            DecasRoomType::parse("cuadruple"),
            Some(DecasRoomType::Quadruple)
        );
        assert_eq!(DecasRoomType::parse("Suite"), None);
    }
}
