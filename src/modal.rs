// 🪟 Detail Modal - overlay showing every attribute of one entity

use crate::entities::{Category, Entity};

/// Where a click landed relative to the open modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The explicit close control
    CloseControl,
    /// The modal root itself, outside its content box
    Backdrop,
    /// Anywhere inside the content box
    Content,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Modal {
    #[default]
    Closed,
    Open(Entity),
}

impl Modal {
    /// Show `entity`. Opening over an open modal replaces its content directly.
    pub fn open(&mut self, entity: Entity) {
        *self = Modal::Open(entity);
    }

    pub fn close(&mut self) {
        *self = Modal::Closed;
    }

    /// Apply a click; returns true when the click closed the modal
    pub fn handle_click(&mut self, target: ClickTarget) -> bool {
        if !self.is_open() {
            return false;
        }
        match target {
            ClickTarget::CloseControl | ClickTarget::Backdrop => {
                self.close();
                true
            }
            ClickTarget::Content => false,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }

    pub fn entity(&self) -> Option<&Entity> {
        match self {
            Modal::Open(entity) => Some(entity),
            Modal::Closed => None,
        }
    }

    /// Container styling; same mapping as cards use
    pub fn category(&self) -> Option<Category> {
        self.entity().map(Entity::category)
    }
}

/// Labelled attribute rows with "Unknown" for anything missing
pub fn detail_rows(entity: &Entity) -> Vec<(&'static str, String)> {
    let name = if entity.name.is_empty() {
        None
    } else {
        Some(entity.name.as_str())
    };

    vec![
        ("Name", Entity::display(name).to_string()),
        ("Species", Entity::display(entity.species.as_deref()).to_string()),
        ("Gender", Entity::display(entity.gender.as_deref()).to_string()),
        ("House", Entity::display(entity.house.as_deref()).to_string()),
        ("Ancestry", Entity::display(entity.ancestry.as_deref()).to_string()),
        ("Patronus", Entity::display(entity.patronus.as_deref()).to_string()),
        ("Actor", Entity::display(entity.actor.as_deref()).to_string()),
    ]
}
