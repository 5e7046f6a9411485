//! Per-entity network-visible metadata store and its wire codec (§3
//! `DataWatcher`, §6 "`DataWatcher` wire format").
//!
//! Each entry maps a `dataId` in `[0, 31]` to a typed value. Mutating an
//! entry sets its dirty flag; the tracker (§4.4) polls the watcher's
//! any-dirty flag to decide whether a metadata packet is owed to watching
//! players.

use std::io::{self, Read, Write};

use terra_utils::serial::{ReadFrom, VarInt, WriteTo};
use terra_utils::BlockPos;

/// A single `DataWatcher` value, tagged by the wire type id it encodes as.
#[derive(Debug, Clone, PartialEq)]
pub enum WatcherValue {
    /// Type 0: a signed byte.
    Byte(i8),
    /// Type 1: a big-endian `i16`.
    Short(i16),
    /// Type 2: a big-endian `i32`.
    Int(i32),
    /// Type 3: a big-endian IEEE-754 `f32`.
    Float(f32),
    /// Type 4: a varint-length-prefixed UTF-8 string.
    String(String),
    /// Type 5: an item stack, or `None` for an empty slot.
    ItemSlot(Option<ItemSlotValue>),
    /// Type 6: three big-endian `i32` block coordinates.
    BlockPos(BlockPos),
}

/// The item-stack payload of a type-5 `DataWatcher` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlotValue {
    pub item_id: i16,
    pub count: i8,
    pub damage: i16,
}

impl WatcherValue {
    const fn type_id(&self) -> u8 {
        match self {
            Self::Byte(_) => 0,
            Self::Short(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::String(_) => 4,
            Self::ItemSlot(_) => 5,
            Self::BlockPos(_) => 6,
        }
    }

    fn write_payload(&self, writer: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Byte(v) => v.write(writer),
            Self::Short(v) => v.write(writer),
            Self::Int(v) => v.write(writer),
            Self::Float(v) => v.write(writer),
            Self::String(s) => s.as_str().write(writer),
            Self::ItemSlot(None) => (-1i16).write(writer),
            Self::ItemSlot(Some(slot)) => {
                slot.item_id.write(writer)?;
                slot.count.write(writer)?;
                slot.damage.write(writer)?;
                // An empty-tag terminator: the full item-stack NBT encoding is
                // an external collaborator (§1); we commit only to the
                // presence-or-absence of a compound, matching §6's "NBT or a
                // terminator 0x00 if empty" for the tag itself.
                0u8.write(writer)
            }
            Self::BlockPos(pos) => {
                pos.x().write(writer)?;
                pos.y().write(writer)?;
                pos.z().write(writer)
            }
        }
    }

    fn read_payload(type_id: u8, data: &mut impl Read) -> io::Result<Self> {
        match type_id {
            0 => Ok(Self::Byte(i8::read(data)?)),
            1 => Ok(Self::Short(i16::read(data)?)),
            2 => Ok(Self::Int(i32::read(data)?)),
            3 => Ok(Self::Float(f32::read(data)?)),
            4 => {
                let len = VarInt::read(data)?.0;
                let mut buf = vec![0u8; len.max(0) as usize];
                data.read_exact(&mut buf)?;
                String::from_utf8(buf)
                    .map(Self::String)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            }
            5 => {
                let item_id = i16::read(data)?;
                if item_id < 0 {
                    // Vanilla's "empty slot" sentinel; no further fields follow.
                    return Ok(Self::ItemSlot(None));
                }
                let count = i8::read(data)?;
                let damage = i16::read(data)?;
                let _tag_terminator = u8::read(data)?;
                Ok(Self::ItemSlot(Some(ItemSlotValue {
                    item_id,
                    count,
                    damage,
                })))
            }
            6 => {
                let x = i32::read(data)?;
                let y = i32::read(data)?;
                let z = i32::read(data)?;
                Ok(Self::BlockPos(BlockPos::new(x, y, z)))
            }
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown DataWatcher type id {other}"),
            )),
        }
    }
}

/// Sentinel byte terminating a `DataWatcher` entry list (§6).
const LIST_TERMINATOR: u8 = 0x7F;

/// A single dirty-tracked `DataWatcher` slot.
#[derive(Debug, Clone)]
struct Entry {
    value: WatcherValue,
    dirty: bool,
}

/// The per-entity keyed metadata store (§3 `DataWatcher`).
///
/// `data_id` ranges over `[0, 31]`; entries are sparse (most slots are
/// unused for a given entity kind). The owning simulation thread is the
/// only writer; serialization readers may hold a shared lock over this
/// structure (§5).
#[derive(Debug, Clone, Default)]
pub struct DataWatcher {
    entries: [Option<Entry>; 32],
    any_dirty: bool,
}

impl DataWatcher {
    /// Creates an empty watcher.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: [const { None }; 32],
            any_dirty: false,
        }
    }

    /// Sets (or overwrites) a slot's value and marks it dirty.
    ///
    /// # Panics
    /// Panics if `data_id >= 32`.
    pub fn set(&mut self, data_id: u8, value: WatcherValue) {
        assert!(data_id < 32, "DataWatcher data_id must be in [0, 32)");
        self.entries[data_id as usize] = Some(Entry { value, dirty: true });
        self.any_dirty = true;
    }

    /// Reads a slot's current value, if set.
    #[must_use]
    pub fn get(&self, data_id: u8) -> Option<&WatcherValue> {
        self.entries.get(data_id as usize)?.as_ref().map(|e| &e.value)
    }

    /// Whether any slot has been mutated since the last [`Self::clear_dirty`].
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.any_dirty
    }

    /// Clears every slot's dirty flag, typically called after the tracker
    /// has flushed a metadata packet for this entity.
    pub fn clear_dirty(&mut self) {
        for entry in self.entries.iter_mut().flatten() {
            entry.dirty = false;
        }
        self.any_dirty = false;
    }

    /// Encodes every set slot to the wire format (§6), terminated by
    /// `0x7F`. If `dirty_only` is set, only dirty slots are written — used
    /// for incremental metadata packets versus a full resend on spawn.
    pub fn write(&self, writer: &mut impl Write, dirty_only: bool) -> io::Result<()> {
        for (data_id, entry) in self.entries.iter().enumerate() {
            let Some(entry) = entry else { continue };
            if dirty_only && !entry.dirty {
                continue;
            }
            #[allow(clippy::cast_possible_truncation)]
            let header = (entry.value.type_id() << 5) | (data_id as u8 & 0x1F);
            header.write(writer)?;
            entry.value.write_payload(writer)?;
        }
        LIST_TERMINATOR.write(writer)
    }

    /// Decodes a wire-format entry list, overwriting the corresponding
    /// slots and marking them dirty.
    pub fn read_into(&mut self, data: &mut impl Read) -> io::Result<()> {
        loop {
            let header = u8::read(data)?;
            if header == LIST_TERMINATOR {
                return Ok(());
            }
            let type_id = header >> 5;
            let data_id = header & 0x1F;
            let value = WatcherValue::read_payload(type_id, data)?;
            self.set(data_id, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// §8 scenario 4: `DataWatcher encode`. The header byte packs
    /// `(type_id << 5) | data_id` per §6; with `byte=0, short=1, int=2,
    /// float=3, utf8=4, item_slot=5, block_pos=6` that gives `0x66` for a
    /// float at data_id 6 and `0x8A` for a utf8 string at data_id 10.
    #[test]
    fn encodes_to_the_committed_byte_sequence() {
        let mut watcher = DataWatcher::new();
        watcher.set(0, WatcherValue::Byte(0x08));
        watcher.set(6, WatcherValue::Float(20.0));
        watcher.set(10, WatcherValue::String("Alice".to_string()));

        let mut buf = Vec::new();
        watcher.write(&mut buf, false).unwrap();

        let expected: Vec<u8> = vec![
            0x00, 0x08, 0x66, 0x41, 0xA0, 0x00, 0x00, 0x8A, 0x05, b'A', b'l', b'i', b'c', b'e',
            0x7F,
        ];
        assert_eq!(buf, expected);
    }

    /// §8 "`DataWatcher` round-trip".
    #[test]
    fn round_trips_through_the_wire_format() {
        let mut watcher = DataWatcher::new();
        watcher.set(0, WatcherValue::Byte(-5));
        watcher.set(6, WatcherValue::Float(1.5));
        watcher.set(10, WatcherValue::String("hello".to_string()));
        watcher.set(
            16,
            WatcherValue::ItemSlot(Some(ItemSlotValue {
                item_id: 1,
                count: 3,
                damage: 0,
            })),
        );
        watcher.set(17, WatcherValue::BlockPos(BlockPos::new(1, 2, 3)));

        let mut buf = Vec::new();
        watcher.write(&mut buf, false).unwrap();

        let mut decoded = DataWatcher::new();
        decoded.read_into(&mut Cursor::new(buf)).unwrap();

        for id in [0, 6, 10, 16, 17] {
            assert_eq!(decoded.get(id), watcher.get(id));
        }
    }

    #[test]
    fn dirty_only_write_skips_clean_entries() {
        let mut watcher = DataWatcher::new();
        watcher.set(0, WatcherValue::Byte(1));
        watcher.clear_dirty();
        watcher.set(1, WatcherValue::Byte(2));

        let mut buf = Vec::new();
        watcher.write(&mut buf, true).unwrap();
        assert_eq!(buf, vec![0x01, 0x02, 0x7F]);
    }

    #[test]
    fn empty_item_slot_round_trips() {
        let mut watcher = DataWatcher::new();
        watcher.set(5, WatcherValue::ItemSlot(None));
        let mut buf = Vec::new();
        watcher.write(&mut buf, false).unwrap();

        let mut decoded = DataWatcher::new();
        decoded.read_into(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded.get(5), Some(&WatcherValue::ItemSlot(None)));
    }
}
