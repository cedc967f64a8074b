use crate::foundation::core::Size;
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::{ActorId, ContentId};

/// What a content object paints.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentKind {
    /// A resizable surface repainted by its owner on invalidation.
    Canvas {
        /// Surface width in pixels.
        width: f64,
        /// Surface height in pixels.
        height: f64,
    },
    /// Pre-decoded image data of a fixed size.
    Image {
        /// Image width in pixels.
        width: f64,
        /// Image height in pixels.
        height: f64,
    },
}

#[derive(Clone, Debug)]
struct ContentEntry {
    kind: ContentKind,
    owner: Option<ActorId>,
    attached: Vec<ActorId>,
    revision: u64,
}

/// Paintable content objects shared between actors.
///
/// Any number of actors may attach and paint a content object, but only its owner (the
/// first actor to attach while it is unowned) may invalidate or resize it.
#[derive(Clone, Debug, Default)]
pub struct ContentStore {
    entries: Vec<ContentEntry>,
}

impl ContentStore {
    /// Register a canvas of the given size.
    pub fn create_canvas(&mut self, width: f64, height: f64) -> ContentId {
        self.insert(ContentKind::Canvas {
            width: width.max(0.0),
            height: height.max(0.0),
        })
    }

    /// Register an image of the given size.
    pub fn create_image(&mut self, width: f64, height: f64) -> ContentId {
        self.insert(ContentKind::Image {
            width: width.max(0.0),
            height: height.max(0.0),
        })
    }

    fn insert(&mut self, kind: ContentKind) -> ContentId {
        let id = ContentId(self.entries.len() as u32);
        self.entries.push(ContentEntry {
            kind,
            owner: None,
            attached: Vec::new(),
            revision: 0,
        });
        id
    }

    fn entry(&self, id: ContentId) -> StageResult<&ContentEntry> {
        self.entries
            .get(id.0 as usize)
            .ok_or_else(|| StageError::content(format!("unknown content {id:?}")))
    }

    fn entry_mut(&mut self, id: ContentId) -> StageResult<&mut ContentEntry> {
        self.entries
            .get_mut(id.0 as usize)
            .ok_or_else(|| StageError::content(format!("unknown content {id:?}")))
    }

    /// Kind and dimensions.
    pub fn kind(&self, id: ContentId) -> StageResult<ContentKind> {
        Ok(self.entry(id)?.kind)
    }

    /// Size an actor showing this content would like to have.
    pub fn preferred_size(&self, id: ContentId) -> Option<Size> {
        let entry = self.entries.get(id.0 as usize)?;
        Some(match entry.kind {
            ContentKind::Canvas { width, height } | ContentKind::Image { width, height } => {
                Size::new(width, height)
            }
        })
    }

    /// Current single writer, if any.
    pub fn owner(&self, id: ContentId) -> StageResult<Option<ActorId>> {
        Ok(self.entry(id)?.owner)
    }

    /// Repaint counter, bumped by every invalidation.
    pub fn revision(&self, id: ContentId) -> StageResult<u64> {
        Ok(self.entry(id)?.revision)
    }

    /// Actors currently showing this content.
    pub fn attached(&self, id: ContentId) -> StageResult<&[ActorId]> {
        Ok(&self.entry(id)?.attached)
    }

    /// Mark the content dirty so it is repainted. Only the owner may do this.
    pub fn invalidate(&mut self, id: ContentId, writer: ActorId) -> StageResult<u64> {
        let entry = self.entry_mut(id)?;
        check_writer(entry, id, writer)?;
        entry.revision += 1;
        Ok(entry.revision)
    }

    /// Resize a canvas. Only the owner may do this; images have a fixed size.
    pub fn set_canvas_size(
        &mut self,
        id: ContentId,
        writer: ActorId,
        width: f64,
        height: f64,
    ) -> StageResult<()> {
        let entry = self.entry_mut(id)?;
        check_writer(entry, id, writer)?;
        match &mut entry.kind {
            ContentKind::Canvas { width: w, height: h } => {
                *w = width.max(0.0);
                *h = height.max(0.0);
                entry.revision += 1;
                Ok(())
            }
            ContentKind::Image { .. } => Err(StageError::content(format!(
                "{id:?} is an image and cannot be resized"
            ))),
        }
    }

    pub(crate) fn attach(&mut self, id: ContentId, actor: ActorId) -> StageResult<()> {
        let entry = self.entry_mut(id)?;
        if !entry.attached.contains(&actor) {
            entry.attached.push(actor);
        }
        if entry.owner.is_none() {
            entry.owner = Some(actor);
        }
        Ok(())
    }

    pub(crate) fn detach(&mut self, id: ContentId, actor: ActorId) {
        if let Some(entry) = self.entries.get_mut(id.0 as usize) {
            entry.attached.retain(|a| *a != actor);
            if entry.owner == Some(actor) {
                entry.owner = None;
            }
        }
    }
}

fn check_writer(entry: &ContentEntry, id: ContentId, writer: ActorId) -> StageResult<()> {
    if entry.owner == Some(writer) {
        return Ok(());
    }
    Err(StageError::content(format!(
        "{writer:?} is not the owner of {id:?} (owner: {:?})",
        entry.owner
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/content.rs"]
mod tests;
