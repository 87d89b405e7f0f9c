//! Line-oriented command console
//!
//! Plays the role of the UI collaborator: every command maps onto one
//! inventory operation, and the console re-reads slot state afterwards to
//! report what happened.
//!
//! ```text
//! pickup potion 3      add three potions
//! drop potion          remove one potion
//! 1 / hotkey 1         use hotkey 1 (key 0 is hotkey 10)
//! click item:0         use the item in a slot
//! rclick item:0        remove one unit from a slot
//! hover hotkey:0       describe a slot
//! move item:0 hotkey:0 drag a stack onto another slot
//! discard equip:0      throw away a whole stack
//! tick 0.5             advance time
//! show                 print the inventory
//! ```

use crate::catalog::ItemCatalog;
use crate::config::KitbagConfig;
use kitbag_inventory::{
    ClickOutcome, Inventory, InventoryError, InventorySession, Removal, SlotGroup, SlotKind,
    SlotRef, TransferOutcome,
};
use std::str::FromStr;
use thiserror::Error;

/// Console errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("not a number: '{0}'")]
    InvalidNumber(String),
    #[error("not a slot: '{0}' (expected equip:N, hotkey:N or item:N)")]
    InvalidSlot(String),
    #[error("no hotkey bound to key '{0}'")]
    InvalidKey(String),
    #[error("no item called '{0}' in the catalog")]
    UnknownItem(String),
    #[error("no room for '{name}' ({placed} placed)")]
    NoRoom { name: String, placed: u32 },
    #[error("no '{0}' in the inventory")]
    NotHeld(String),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pickup { name: String, count: u32 },
    Drop { name: String },
    /// 0-based hotkey index
    Hotkey(usize),
    Click(SlotRef),
    RightClick(SlotRef),
    Hover(SlotRef),
    Move { from: SlotRef, to: SlotRef },
    Discard(SlotRef),
    Tick(f32),
    Show,
    Items,
    Help,
}

fn parse_slot(s: &str) -> Result<SlotRef, CommandError> {
    let invalid = || CommandError::InvalidSlot(s.to_string());
    let (group, index) = s.split_once(':').ok_or_else(invalid)?;
    let index = index.parse().map_err(|_| invalid())?;
    match group.to_lowercase().as_str() {
        "equip" | "equipment" | "e" => Ok(SlotRef::equipment(index)),
        "hotkey" | "h" => Ok(SlotRef::hotkey(index)),
        "item" | "i" => Ok(SlotRef::item(index)),
        _ => Err(invalid()),
    }
}

fn parse_key(s: &str) -> Result<usize, CommandError> {
    s.parse::<u8>()
        .ok()
        .and_then(Inventory::hotkey_for_key)
        .ok_or_else(|| CommandError::InvalidKey(s.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Help);
        };

        let mut arg = |command: &'static str, argument: &'static str| {
            words
                .next()
                .ok_or(CommandError::MissingArgument { command, argument })
        };

        match head.to_lowercase().as_str() {
            "pickup" | "add" => {
                let name = arg("pickup", "an item name")?.to_string();
                let count = match arg("pickup", "a count") {
                    Ok(n) => n
                        .parse()
                        .map_err(|_| CommandError::InvalidNumber(n.to_string()))?,
                    Err(_) => 1,
                };
                Ok(Self::Pickup { name, count })
            }
            "drop" | "remove" => Ok(Self::Drop {
                name: arg("drop", "an item name")?.to_string(),
            }),
            "hotkey" | "key" => Ok(Self::Hotkey(parse_key(arg("hotkey", "a key")?)?)),
            "click" | "use" => Ok(Self::Click(parse_slot(arg("click", "a slot")?)?)),
            "rclick" => Ok(Self::RightClick(parse_slot(arg("rclick", "a slot")?)?)),
            "hover" => Ok(Self::Hover(parse_slot(arg("hover", "a slot")?)?)),
            "move" | "drag" => {
                let from = parse_slot(arg("move", "a source slot")?)?;
                let to = parse_slot(arg("move", "a target slot")?)?;
                Ok(Self::Move { from, to })
            }
            "discard" => Ok(Self::Discard(parse_slot(arg("discard", "a slot")?)?)),
            "tick" => {
                let s = arg("tick", "seconds")?;
                match s.parse::<f32>() {
                    Ok(dt) if dt.is_finite() && dt >= 0.0 => Ok(Self::Tick(dt)),
                    _ => Err(CommandError::InvalidNumber(s.to_string())),
                }
            }
            "show" | "inv" => Ok(Self::Show),
            "items" => Ok(Self::Items),
            "help" | "?" => Ok(Self::Help),
            digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                Ok(Self::Hotkey(parse_key(digit)?))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Console over one inventory session and an item catalog
#[derive(Debug)]
pub struct Console {
    session: InventorySession,
    catalog: ItemCatalog,
}

impl Console {
    pub fn new(config: &KitbagConfig) -> Self {
        Self {
            session: InventorySession::new(&config.layout),
            catalog: ItemCatalog::new(config.items.clone()),
        }
    }

    pub fn session(&self) -> &InventorySession {
        &self.session
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Parse and run one line
    pub fn execute_line(&mut self, line: &str) -> Result<Vec<String>, CommandError> {
        let command: Command = line.parse()?;
        self.execute(command)
    }

    /// Run a command, returning the lines to print
    pub fn execute(&mut self, command: Command) -> Result<Vec<String>, CommandError> {
        match command {
            Command::Pickup { name, count } => self.pickup(&name, count),
            Command::Drop { name } => self.drop_item(&name),
            Command::Hotkey(index) => {
                let name = self.name_in(SlotRef::hotkey(index));
                let outcome = self.session.use_hotkey(index)?;
                Ok(vec![describe_click(name, outcome)])
            }
            Command::Click(slot) => {
                let name = self.name_in(slot);
                let outcome = self.session.left_click(slot)?;
                Ok(vec![describe_click(name, outcome)])
            }
            Command::RightClick(slot) => {
                let name = self.name_in(slot).unwrap_or_default();
                let line = match self.session.right_click(slot)? {
                    Removal::Empty => format!("{} is empty", slot),
                    Removal::Decremented { remaining } => {
                        format!("Removed one {}, {} left in {}", name, remaining, slot)
                    }
                    Removal::Cleared(item) => format!("Removed the last {} from {}", item.name(), slot),
                };
                Ok(vec![line])
            }
            Command::Hover(slot) => {
                let line = match self.session.inventory.hover(slot)? {
                    Some(tip) => format!(
                        "{} [{}] {}/{}: {}",
                        tip.name, tip.item_type, tip.count, tip.limit, tip.description
                    ),
                    None => format!("{} is empty", slot),
                };
                Ok(vec![line])
            }
            Command::Move { from, to } => {
                let name = self.name_in(from).unwrap_or_default();
                let line = match self.session.transfer(from, to)? {
                    TransferOutcome::Moved { count } => {
                        format!("Moved {} x {} to {}", count, name, to)
                    }
                    TransferOutcome::Merged { moved, count } => {
                        format!("Merged {} x {} into {} ({} now)", moved, name, to, count)
                    }
                    TransferOutcome::Split { moved, remaining } => format!(
                        "Moved {} x {} to {}, {} left in {}",
                        moved, name, to, remaining, from
                    ),
                };
                Ok(vec![line])
            }
            Command::Discard(slot) => {
                let count = self.session.inventory.slot(slot).map_or(0, |s| s.stack_count());
                let line = match self.session.discard(slot)? {
                    Some(item) => format!("Discarded {} x {}", count, item.name()),
                    None => format!("{} is empty", slot),
                };
                Ok(vec![line])
            }
            Command::Tick(dt) => {
                self.session.tick(dt);
                Ok(vec![format!("Advanced {}s", dt)])
            }
            Command::Show => Ok(self.render()),
            Command::Items => Ok(self
                .catalog
                .specs()
                .iter()
                .map(|spec| format!("{} ({}, stack {})", spec.name, spec.item_type, spec.max_stack))
                .collect()),
            Command::Help => Ok(HELP.lines().map(str::to_string).collect()),
        }
    }

    fn name_in(&self, slot: SlotRef) -> Option<String> {
        self.session
            .inventory
            .slot(slot)
            .and_then(|s| s.current_item())
            .map(|item| item.name().to_string())
    }

    fn pickup(&mut self, name: &str, count: u32) -> Result<Vec<String>, CommandError> {
        let mut lines = Vec::new();
        for placed in 0..count {
            let item = self
                .catalog
                .create(name)
                .ok_or_else(|| CommandError::UnknownItem(name.to_string()))?;
            match self.session.add_item(item) {
                Ok(slot) => lines.push(format!("Picked up {} -> {}", name, slot)),
                Err(item) => {
                    log::warn!("Inventory full, '{}' stays on the ground", item.name());
                    return Err(CommandError::NoRoom {
                        name: name.to_string(),
                        placed,
                    });
                }
            }
        }
        Ok(lines)
    }

    fn drop_item(&mut self, name: &str) -> Result<Vec<String>, CommandError> {
        let held_type = self
            .session
            .inventory
            .slots()
            .find_map(|(_, slot)| slot.current_item().filter(|item| item.name() == name))
            .map(|item| item.item_type());
        let item_type = held_type
            .or_else(|| self.catalog.spec(name).map(|spec| spec.item_type))
            .ok_or_else(|| CommandError::UnknownItem(name.to_string()))?;

        if self.session.remove_item(name, item_type) {
            Ok(vec![format!("Dropped one {}", name)])
        } else {
            Err(CommandError::NotHeld(name.to_string()))
        }
    }

    /// Render the inventory, one line per slot worth showing
    pub fn render(&self) -> Vec<String> {
        let inventory = &self.session.inventory;
        let mut lines = Vec::new();

        for group in [SlotGroup::Equipment, SlotGroup::Hotkeys, SlotGroup::Items] {
            let slots = inventory.group(group);
            let used = slots.iter().filter(|slot| slot.is_occupied()).count();
            lines.push(format!("{:?} ({}/{} used)", group, used, slots.len()));

            for (index, slot) in slots.iter().enumerate() {
                let at = SlotRef { group, index };
                let label = match slot.kind() {
                    SlotKind::Equipment { region } => format!("{} [{:?}]", at, region),
                    SlotKind::HotKey { number } => format!("{} [key {}]", at, number % 10),
                    SlotKind::Item => at.to_string(),
                };
                match slot.current_item() {
                    Some(item) => lines.push(format!(
                        "  {} {} x{}/{}",
                        label,
                        item.name(),
                        slot.stack_count(),
                        slot.stack_limit()
                    )),
                    // empty grid slots are left out
                    None if group != SlotGroup::Items => lines.push(format!("  {} -", label)),
                    None => {}
                }
            }
        }

        lines.push(format!(
            "Passive effects: {}, player tint {}",
            self.session.registry.len(),
            self.catalog.tint().get()
        ));
        lines
    }
}

fn describe_click(name: Option<String>, outcome: ClickOutcome) -> String {
    let name = name.unwrap_or_default();
    match outcome {
        ClickOutcome::Empty => "Nothing to use".to_string(),
        ClickOutcome::NotUsable => format!("{} cannot be used", name),
        ClickOutcome::CoolingDown { remaining } => {
            format!("{} is cooling down ({:.1}s)", name, remaining)
        }
        ClickOutcome::Used { consumed: true } => format!("Used {} (consumed)", name),
        ClickOutcome::Used { consumed: false } => format!("Used {}", name),
    }
}

const HELP: &str = "\
Commands:
  pickup <name> [count]  add items from the catalog
  drop <name>            remove one unit by name
  hotkey <key> | <key>   use a hotkey (keys 1-9, 0 for the tenth)
  click <slot>           use the item in a slot
  rclick <slot>          remove one unit from a slot
  hover <slot>           describe a slot
  move <from> <to>       drag a stack onto another slot
  discard <slot>         throw away a whole stack
  tick <seconds>         advance cooldowns and effects
  show                   print the inventory
  items                  list the catalog
  exit                   quit
Slots are written equip:N, hotkey:N or item:N (0-based).";
