//! Inventory menu helpers.
//!
//! [`ItemStack`] is plain serde data in the host's item shape; the helpers
//! here only populate it. [`InventoryView`] assembles a chest menu out of
//! placed items and filler panels; the [`codec`] turns item slices and whole
//! views into base64 blobs for storage.

pub mod codec;

pub use codec::{decode_item, decode_items, encode_item, encode_items};

use serde::{Deserialize, Serialize};

use crate::error::{ItemError, ItemResult};
use crate::text::colorize;
use crate::types::NamespacedKey;

/// Columns per menu row, fixed by the client's chest layout.
pub const ROW_WIDTH: usize = 9;

/// Meta flags hiding parts of an item's tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFlag {
    HideAttributes,
    HideEnchants,
}

/// An enchantment by key and level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enchantment {
    pub key: NamespacedKey,
    pub level: u32,
}

/// One stack of items, in the shape the host serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub id: NamespacedKey,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enchantments: Vec<Enchantment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<ItemFlag>,
}

impl ItemStack {
    pub fn new(id: NamespacedKey, count: u32) -> Self {
        Self {
            id,
            count,
            name: None,
            lore: Vec::new(),
            enchantments: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Sets the display name, translating color codes.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(colorize(name));
        self
    }

    /// Sets the lore lines, translating color codes per line.
    pub fn with_lore(mut self, lines: &[&str]) -> Self {
        self.lore = lines.iter().map(|line| colorize(line)).collect();
        self
    }

    pub fn with_flags(mut self, flags: &[ItemFlag]) -> Self {
        for flag in flags {
            if !self.flags.contains(flag) {
                self.flags.push(*flag);
            }
        }
        self
    }

    /// Whether the stack is storable. A zero-count stack is not an item;
    /// the codec writes it out as an empty slot.
    pub fn is_valid(&self) -> bool {
        self.count > 0
    }

    /// Gives the item an enchantment shimmer: a level-1 power enchantment
    /// with both tooltip lines hidden.
    pub fn glowing(mut self) -> Self {
        self.enchantments.push(Enchantment {
            key: NamespacedKey::minecraft("power").expect("static key is valid"),
            level: 1,
        });
        self.with_flags(&[ItemFlag::HideAttributes, ItemFlag::HideEnchants])
    }
}

/// Builds a menu item: named, with lore, tooltip noise hidden. What every
/// button in a chest menu starts as.
pub fn menu_item(id: NamespacedKey, count: u32, name: &str, lore: &[&str]) -> ItemStack {
    ItemStack::new(id, count)
        .named(name)
        .with_lore(lore)
        .with_flags(&[ItemFlag::HideAttributes, ItemFlag::HideEnchants])
}

/// A chest menu under construction: a title and `rows * 9` slots.
///
/// Slots are 1-based, matching how menu layouts are written out in configs
/// (slot 1 is the top-left corner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryView {
    title: String,
    rows: usize,
    slots: Vec<Option<ItemStack>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filler: Option<ItemStack>,
}

impl InventoryView {
    /// A new empty view. The title is colorized; `rows` is clamped to the
    /// client's 1..=6 chest rows.
    pub fn new(title: &str, rows: usize) -> Self {
        let rows = rows.clamp(1, 6);
        Self {
            title: colorize(title),
            rows,
            slots: vec![None; rows * ROW_WIDTH],
            filler: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Places an item at a 1-based slot.
    pub fn place(&mut self, slot: usize, item: ItemStack) -> ItemResult<()> {
        let index = self.index_of(slot)?;
        self.slots[index] = Some(item);
        Ok(())
    }

    /// The item at a 1-based slot.
    pub fn slot(&self, slot: usize) -> ItemResult<Option<&ItemStack>> {
        let index = self.index_of(slot)?;
        Ok(self.slots[index].as_ref())
    }

    /// Every slot in order, `None` where nothing was placed.
    pub fn items(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Sets the panel filler. A filler without a display name gets the
    /// blank white one, so the tooltip shows nothing.
    pub fn set_filler(&mut self, item: ItemStack) {
        let item = if item.name.is_none() {
            item.named("&f")
                .with_flags(&[ItemFlag::HideAttributes, ItemFlag::HideEnchants])
        } else {
            item
        };
        self.filler = Some(item);
    }

    /// Fills every empty slot with the filler. Answers how many slots were
    /// filled; without a filler set this is a no-op.
    pub fn fill_empty(&mut self) -> usize {
        let Some(filler) = self.filler.clone() else {
            return 0;
        };
        let mut filled = 0;
        for slot in &mut self.slots {
            if slot.is_none() {
                *slot = Some(filler.clone());
                filled += 1;
            }
        }
        filled
    }

    /// Encodes the view's slots as a base64 blob.
    pub fn to_blob(&self) -> ItemResult<String> {
        codec::encode_items(&self.slots)
    }

    /// Replaces the view's slots from a blob. A blob smaller than the view
    /// leaves the tail empty; a larger one is an error.
    pub fn load_blob(&mut self, blob: &str) -> ItemResult<()> {
        let items = codec::decode_items(blob)?;
        if items.len() > self.slots.len() {
            return Err(ItemError::SlotOutOfRange {
                slot: items.len(),
                size: self.slots.len(),
            });
        }
        self.slots = vec![None; self.rows * ROW_WIDTH];
        self.slots[..items.len()].clone_from_slice(&items);
        Ok(())
    }

    fn index_of(&self, slot: usize) -> ItemResult<usize> {
        if slot == 0 || slot > self.slots.len() {
            return Err(ItemError::SlotOutOfRange {
                slot,
                size: self.slots.len(),
            });
        }
        Ok(slot - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone() -> NamespacedKey {
        NamespacedKey::minecraft("stone").unwrap()
    }

    fn pane() -> NamespacedKey {
        NamespacedKey::minecraft("white_stained_glass_pane").unwrap()
    }

    #[test]
    fn test_menu_item_colorizes_and_hides_tooltip_noise() {
        let item = menu_item(stone(), 1, "&6Button", &["&7Click me"]);
        assert_eq!(item.name.as_deref(), Some("§6Button"));
        assert_eq!(item.lore, vec!["§7Click me".to_string()]);
        assert!(item.flags.contains(&ItemFlag::HideAttributes));
        assert!(item.flags.contains(&ItemFlag::HideEnchants));
    }

    #[test]
    fn test_glowing_adds_hidden_power_enchant() {
        let item = ItemStack::new(stone(), 1).glowing();
        assert_eq!(item.enchantments.len(), 1);
        assert_eq!(item.enchantments[0].key.key(), "power");
        assert_eq!(item.enchantments[0].level, 1);
        assert!(item.flags.contains(&ItemFlag::HideEnchants));
    }

    #[test]
    fn test_with_flags_deduplicates() {
        let item = ItemStack::new(stone(), 1)
            .with_flags(&[ItemFlag::HideEnchants])
            .with_flags(&[ItemFlag::HideEnchants, ItemFlag::HideAttributes]);
        assert_eq!(item.flags.len(), 2);
    }

    #[test]
    fn test_place_is_one_based() {
        let mut view = InventoryView::new("&8Menu", 3);
        assert_eq!(view.size(), 27);

        view.place(1, menu_item(stone(), 1, "first", &[])).unwrap();
        view.place(27, menu_item(stone(), 1, "last", &[])).unwrap();
        assert!(view.slot(1).unwrap().is_some());
        assert!(view.slot(2).unwrap().is_none());
        assert!(view.slot(27).unwrap().is_some());

        assert!(matches!(
            view.place(0, menu_item(stone(), 1, "x", &[])),
            Err(ItemError::SlotOutOfRange { slot: 0, .. })
        ));
        assert!(view.place(28, menu_item(stone(), 1, "x", &[])).is_err());
    }

    #[test]
    fn test_fill_empty_respects_placed_items() {
        let mut view = InventoryView::new("&8Menu", 1);
        view.place(5, menu_item(stone(), 1, "&6Middle", &[])).unwrap();
        view.set_filler(ItemStack::new(pane(), 1));

        assert_eq!(view.fill_empty(), 8);
        // The placed item stays; the filler carries the blank name.
        assert_eq!(view.slot(5).unwrap().unwrap().name.as_deref(), Some("§6Middle"));
        assert_eq!(view.slot(1).unwrap().unwrap().name.as_deref(), Some("§f"));
    }

    #[test]
    fn test_fill_empty_without_filler_is_noop() {
        let mut view = InventoryView::new("&8Menu", 1);
        assert_eq!(view.fill_empty(), 0);
        assert!(view.items().iter().all(Option::is_none));
    }

    #[test]
    fn test_rows_are_clamped_to_chest_sizes() {
        assert_eq!(InventoryView::new("t", 0).size(), 9);
        assert_eq!(InventoryView::new("t", 10).size(), 54);
    }

    #[test]
    fn test_view_blob_round_trip() {
        let mut view = InventoryView::new("&8Vault", 2);
        view.place(3, menu_item(stone(), 64, "&7Stack", &["&8kept"])).unwrap();

        let blob = view.to_blob().unwrap();
        let mut restored = InventoryView::new("&8Vault", 2);
        restored.load_blob(&blob).unwrap();
        assert_eq!(restored.items(), view.items());

        // A one-row view cannot hold a two-row blob.
        let mut small = InventoryView::new("&8Vault", 1);
        assert!(small.load_blob(&blob).is_err());
    }
}
