//! Integration tests for kitbag_inventory

use kitbag_inventory::*;
use parking_lot::Mutex;
use std::sync::Arc;

type CallLog = Arc<Mutex<Vec<(ItemId, &'static str)>>>;

// Effect that records the order of hook calls
struct Recorder {
    log: CallLog,
}

impl ItemEffect for Recorder {
    fn on_use(&mut self, ctx: &EffectContext<'_>) {
        self.log.lock().push((ctx.id, "use"));
    }

    fn apply(&mut self, ctx: &EffectContext<'_>) {
        self.log.lock().push((ctx.id, "apply"));
    }

    fn remove(&mut self, ctx: &EffectContext<'_>) {
        self.log.lock().push((ctx.id, "remove"));
    }

    fn on_tick(&mut self, ctx: &EffectContext<'_>) {
        self.log.lock().push((ctx.id, "tick"));
    }
}

struct Fixture {
    ids: IdGenerator,
    log: CallLog,
    session: InventorySession,
}

impl Fixture {
    fn new(layout: InventoryLayout) -> Self {
        Self {
            ids: IdGenerator::new(),
            log: Arc::new(Mutex::new(Vec::new())),
            session: InventorySession::new(&layout),
        }
    }

    fn item(&self, name: &str, kind: ItemKind, max_stack: u32) -> Item {
        Item::new(self.ids.next(), name, kind)
            .with_max_stack(max_stack)
            .with_effect(Recorder { log: self.log.clone() })
    }

    fn potion(&self) -> Item {
        self.item("potion", ItemKind::Active(ActiveProfile::consumable()), 5)
    }

    fn helmet(&self) -> Item {
        self.item("helmet", ItemKind::Equipment(EquipRegion::Head), 1)
    }

    fn calls(&self) -> Vec<(ItemId, &'static str)> {
        self.log.lock().clone()
    }

    fn assert_invariants(&self) {
        for (at, slot) in self.session.inventory.slots() {
            assert_eq!(slot.is_occupied(), slot.current_item().is_some(), "{}", at);
            assert!(slot.stack_count() <= slot.stack_limit(), "{}", at);
            assert_eq!(slot.stack_count() == 0, slot.current_item().is_none(), "{}", at);
            if let Some(item) = slot.current_item() {
                assert_eq!(item.current_stack_size(), slot.stack_count(), "{}", at);
                assert_eq!(self.session.registry.contains(item.id()), item.is_passive(), "{}", at);
            }
        }
    }

    fn snapshot(&self) -> Vec<(SlotRef, Option<String>, u32)> {
        self.session
            .inventory
            .slots()
            .map(|(at, slot)| (at, slot.current_item().map(|i| i.name().to_string()), slot.stack_count()))
            .collect()
    }
}

fn tight_layout() -> InventoryLayout {
    InventoryLayout::default().with_hotkeys(2).with_grid(1, 2)
}

#[test]
fn test_removing_every_unit_empties_slot() {
    let mut fx = Fixture::new(tight_layout());
    for _ in 0..4 {
        let potion = fx.potion();
        fx.session.add_item(potion).unwrap();
    }

    let count = fx.session.inventory.slot(SlotRef::item(0)).unwrap().stack_count();
    assert_eq!(count, 4);
    for _ in 0..count {
        assert!(fx.session.right_click(SlotRef::item(0)).unwrap().removed());
    }
    assert!(!fx.session.inventory.slot(SlotRef::item(0)).unwrap().is_occupied());
    assert!(!fx.session.right_click(SlotRef::item(0)).unwrap().removed());
    fx.assert_invariants();
}

#[test]
fn test_transfer_round_trip() {
    let mut fx = Fixture::new(tight_layout());
    for _ in 0..3 {
        let potion = fx.potion();
        fx.session.add_item(potion).unwrap();
    }

    let outcome = fx.session.transfer(SlotRef::item(0), SlotRef::hotkey(0)).unwrap();
    assert_eq!(outcome, TransferOutcome::Moved { count: 3 });

    let target = fx.session.inventory.slot(SlotRef::hotkey(0)).unwrap();
    assert_eq!(target.stack_count(), 3);
    assert_eq!(target.current_item().unwrap().current_stack_size(), 3);
    assert!(!fx.session.inventory.slot(SlotRef::item(0)).unwrap().is_occupied());
    fx.assert_invariants();
}

#[test]
fn test_partial_transfer_five_onto_three() {
    let mut fx = Fixture::new(tight_layout());
    for _ in 0..8 {
        let potion = fx.potion();
        fx.session.add_item(potion).unwrap();
    }
    // item:0 holds 5, item:1 holds 3
    assert_eq!(fx.session.inventory.slot(SlotRef::item(1)).unwrap().stack_count(), 3);

    let outcome = fx.session.transfer(SlotRef::item(0), SlotRef::item(1)).unwrap();
    assert_eq!(outcome, TransferOutcome::Split { moved: 2, remaining: 3 });

    let a = fx.session.inventory.slot(SlotRef::item(0)).unwrap();
    let b = fx.session.inventory.slot(SlotRef::item(1)).unwrap();
    assert_eq!(b.stack_count(), 5);
    assert_eq!(a.stack_count(), 3);
    assert!(a.is_occupied() && b.is_occupied());
    fx.assert_invariants();
}

#[test]
fn test_equip_unequip_pairing() {
    let mut fx = Fixture::new(tight_layout());
    let helmet = fx.helmet();
    let id = helmet.id();

    let at = fx.session.add_item(helmet).unwrap();
    fx.assert_invariants();
    let dropped = fx.session.discard(at).unwrap();
    assert!(dropped.is_some());

    assert!(!fx.session.registry.contains(id));
    assert_eq!(fx.calls(), vec![(id, "apply"), (id, "remove")]);
}

#[test]
fn test_head_item_rejected_when_head_slot_taken() {
    let mut fx = Fixture::new(tight_layout().with_grid(1, 1));
    let filler = fx.potion();
    fx.session.add_item(filler).unwrap();
    let first = fx.helmet();
    assert_eq!(fx.session.add_item(first).unwrap(), SlotRef::equipment(0));

    let before = fx.snapshot();
    let registered = fx.session.registry.len();
    let second = fx.helmet();
    let second_id = second.id();

    let returned = fx.session.add_item(second).unwrap_err();
    assert_eq!(returned.id(), second_id);
    assert_eq!(fx.snapshot(), before);
    assert_eq!(fx.session.registry.len(), registered);
    assert!(!fx.calls().contains(&(second_id, "apply")));
}

#[test]
fn test_remove_absent_name() {
    let mut fx = Fixture::new(tight_layout());
    let potion = fx.potion();
    fx.session.add_item(potion).unwrap();
    let before = fx.snapshot();

    assert!(!fx.session.remove_item("elixir", ItemType::Active));
    assert!(!fx.session.remove_item("elixir", ItemType::HeadEquip));
    assert_eq!(fx.snapshot(), before);
}

#[test]
fn test_remove_prefers_hotkeys() {
    let mut fx = Fixture::new(tight_layout());
    for _ in 0..6 {
        let potion = fx.potion();
        fx.session.add_item(potion).unwrap();
    }
    // item:0 holds 5, the sixth potion sits alone in item:1
    fx.session.transfer(SlotRef::item(1), SlotRef::hotkey(1)).unwrap();

    assert!(fx.session.remove_item("potion", ItemType::Active));
    assert!(!fx.session.inventory.slot(SlotRef::hotkey(1)).unwrap().is_occupied());
    assert_eq!(fx.session.inventory.slot(SlotRef::item(0)).unwrap().stack_count(), 5);

    assert!(fx.session.remove_item("potion", ItemType::Active));
    assert_eq!(fx.session.inventory.slot(SlotRef::item(0)).unwrap().stack_count(), 4);
    fx.assert_invariants();
}

#[test]
fn test_hotkey_use_consumes_stack_units() {
    let mut fx = Fixture::new(tight_layout());
    let first = fx.potion();
    let first_id = first.id();
    fx.session.add_item(first).unwrap();
    let second = fx.potion();
    fx.session.add_item(second).unwrap();
    fx.session.transfer(SlotRef::item(0), SlotRef::hotkey(0)).unwrap();

    assert_eq!(fx.session.use_hotkey(0).unwrap(), ClickOutcome::Used { consumed: true });
    assert_eq!(fx.session.use_hotkey(0).unwrap(), ClickOutcome::Used { consumed: true });
    assert_eq!(fx.session.use_hotkey(0).unwrap(), ClickOutcome::Empty);
    assert_eq!(
        fx.session.use_hotkey(5),
        Err(InventoryError::HotkeyOutOfRange { index: 5, len: 2 })
    );

    // the surviving instance carries the stack, so its effect runs each time
    assert_eq!(fx.calls(), vec![(first_id, "use"), (first_id, "use")]);
}

#[test]
fn test_ongoing_effect_follows_item() {
    let mut fx = Fixture::new(tight_layout());
    let charm = fx.item("charm", ItemKind::Passive, 1).with_repeating_effect(0.5);
    let id = charm.id();

    let at = fx.session.add_item(charm).unwrap();
    fx.session.tick(1.0);
    fx.session.transfer(at, SlotRef::hotkey(0)).unwrap();
    fx.session.tick(0.5);
    fx.session.right_click(SlotRef::hotkey(0)).unwrap();
    fx.session.tick(2.0);

    assert_eq!(
        fx.calls(),
        vec![(id, "apply"), (id, "tick"), (id, "tick"), (id, "tick"), (id, "remove")]
    );
    fx.assert_invariants();
}

#[test]
fn test_hybrid_item_is_usable_and_passive() {
    let mut fx = Fixture::new(tight_layout());
    let trinket = fx.item("trinket", ItemKind::Hybrid(ActiveProfile::reusable().with_cooldown(1.0)), 1);
    let id = trinket.id();
    let at = fx.session.add_item(trinket).unwrap();

    assert_eq!(fx.session.left_click(at).unwrap(), ClickOutcome::Used { consumed: false });
    assert!(matches!(fx.session.left_click(at).unwrap(), ClickOutcome::CoolingDown { .. }));
    fx.session.tick(1.0);
    assert_eq!(fx.session.left_click(at).unwrap(), ClickOutcome::Used { consumed: false });

    assert!(fx.session.registry.contains(id));
    assert_eq!(fx.calls(), vec![(id, "apply"), (id, "use"), (id, "use")]);
}
