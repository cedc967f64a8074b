use crate::foundation::color::Color;
use crate::foundation::core::{ActorBox, Affine, Margin, Point, Rect, Size, Vec2};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::ids::{ActorId, ContentId};
use crate::layout::{LayoutManager, SizeRequest};
use crate::scene::actor::{
    ActorNode, ChildLayoutProps, EasingState, LayoutAlign, PropertyId, PropertyValue, ScrollMode,
};
use crate::scene::content::ContentStore;
use crate::scene::notify::Notification;

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) node: Option<ActorNode>,
}

/// Where a newly attached child goes in its parent's child list.
#[derive(Clone, Copy, Debug)]
enum InsertAt {
    Index(usize),
    Above(Option<ActorId>),
    Below(Option<ActorId>),
}

/// Arena-backed actor tree rooted at the stage actor.
///
/// Actors are addressed through generational [`ActorId`] handles. A parent owns its
/// children: destroying it destroys the whole subtree. Child list order is paint order
/// (first child painted first, last child on top).
#[derive(Debug)]
pub struct SceneGraph {
    pub(crate) slots: Vec<Slot>,
    pub(crate) free: Vec<u32>,
    pub(crate) root: ActorId,
    pub(crate) stage_size: Size,
    pub(crate) content: ContentStore,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) needs_relayout: bool,
    pub(crate) frame: u64,
}

impl SceneGraph {
    /// Create a graph whose root ("stage") actor covers `width` x `height`.
    pub fn new(width: f64, height: f64) -> Self {
        let mut root = ActorNode::new(Some("stage".to_owned()));
        root.reactive = true;
        root.request_width = Some(width.max(0.0));
        root.request_height = Some(height.max(0.0));
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            root: ActorId {
                idx: 0,
                generation: 0,
            },
            stage_size: Size::new(width.max(0.0), height.max(0.0)),
            content: ContentStore::default(),
            notifications: Vec::new(),
            needs_relayout: true,
            frame: 0,
        }
    }

    /// The stage actor at the root of the tree.
    pub fn root(&self) -> ActorId {
        self.root
    }

    /// Stage dimensions.
    pub fn stage_size(&self) -> Size {
        self.stage_size
    }

    /// Resize the stage.
    pub fn set_stage_size(&mut self, width: f64, height: f64) {
        self.stage_size = Size::new(width.max(0.0), height.max(0.0));
        let root = self.root;
        if let Some(node) = self.node_mut(root) {
            node.request_width = Some(width.max(0.0));
            node.request_height = Some(height.max(0.0));
        }
        self.queue_relayout();
    }

    /// Number of live actors, including the stage.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// Whether the stage is the only actor.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Whether `id` refers to a live actor.
    pub fn contains(&self, id: ActorId) -> bool {
        self.node(id).is_some()
    }

    pub(crate) fn node(&self, id: ActorId) -> Option<&ActorNode> {
        let slot = self.slots.get(id.idx as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn node_mut(&mut self, id: ActorId) -> Option<&mut ActorNode> {
        let slot = self.slots.get_mut(id.idx as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn get(&self, id: ActorId) -> StageResult<&ActorNode> {
        self.node(id).ok_or(StageError::StaleActor(id))
    }

    pub(crate) fn get_mut(&mut self, id: ActorId) -> StageResult<&mut ActorNode> {
        self.node_mut(id).ok_or(StageError::StaleActor(id))
    }

    pub(crate) fn notify(&mut self, n: Notification) {
        self.notifications.push(n);
    }

    pub(crate) fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Mark the layout stale; the next frame recomputes every allocation.
    pub fn queue_relayout(&mut self) {
        self.needs_relayout = true;
    }

    /// Whether something changed since the last allocation pass.
    pub fn needs_relayout(&self) -> bool {
        self.needs_relayout
    }

    // ---------------------------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------------------------

    /// Create a detached, unnamed actor.
    pub fn create_actor(&mut self) -> ActorId {
        self.create_node(None)
    }

    /// Create a detached actor with a name.
    pub fn create_named(&mut self, name: &str) -> ActorId {
        self.create_node(Some(name.to_owned()))
    }

    fn create_node(&mut self, name: Option<String>) -> ActorId {
        let node = ActorNode::new(name);
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(node);
            return ActorId {
                idx,
                generation: slot.generation,
            };
        }
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        ActorId { idx, generation: 0 }
    }

    /// Destroy `id` and its whole subtree. Returns the destroyed handles, children first.
    ///
    /// Constraints on surviving actors that use a destroyed actor as source are detached.
    pub(crate) fn destroy(&mut self, id: ActorId) -> StageResult<Vec<ActorId>> {
        self.get(id)?;
        if id == self.root {
            return Err(StageError::structural("the stage actor cannot be destroyed"));
        }

        if let Some(parent) = self.get(id)?.parent {
            self.detach_from_parent(parent, id)?;
        }

        let doomed = self.subtree_postorder(id);
        for &actor in &doomed {
            if let Some(content) = self.node(actor).and_then(|n| n.content) {
                self.content.detach(content, actor);
            }
            let slot = &mut self.slots[actor.idx as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(actor.idx);
            self.notify(Notification::ActorDestroyed { actor });
            tracing::debug!(?actor, "actor destroyed");
        }

        self.detach_constraints_for(&doomed);
        self.queue_relayout();
        Ok(doomed)
    }

    pub(crate) fn subtree_postorder(&self, id: ActorId) -> Vec<ActorId> {
        fn walk(graph: &SceneGraph, id: ActorId, out: &mut Vec<ActorId>) {
            if let Some(node) = graph.node(id) {
                for &child in &node.children {
                    walk(graph, child, out);
                }
                out.push(id);
            }
        }
        let mut out = Vec::new();
        walk(self, id, &mut out);
        out
    }

    pub(crate) fn subtree_preorder(&self, id: ActorId) -> Vec<ActorId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(a) = stack.pop() {
            if let Some(node) = self.node(a) {
                out.push(a);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    // ---------------------------------------------------------------------------------------
    // Tree queries
    // ---------------------------------------------------------------------------------------

    /// Actor name.
    pub fn name(&self, id: ActorId) -> StageResult<Option<&str>> {
        Ok(self.get(id)?.name.as_deref())
    }

    /// Rename an actor.
    pub fn set_name(&mut self, id: ActorId, name: Option<&str>) -> StageResult<()> {
        self.get_mut(id)?.name = name.map(str::to_owned);
        Ok(())
    }

    /// Depth-first search for an actor called `name` in `from`'s subtree.
    pub fn find_by_name(&self, from: ActorId, name: &str) -> Option<ActorId> {
        self.subtree_preorder(from)
            .into_iter()
            .find(|&a| self.node(a).and_then(|n| n.name.as_deref()) == Some(name))
    }

    /// Parent of `id`, if attached.
    pub fn parent(&self, id: ActorId) -> StageResult<Option<ActorId>> {
        Ok(self.get(id)?.parent)
    }

    /// Children of `id` in paint order.
    pub fn children(&self, id: ActorId) -> StageResult<&[ActorId]> {
        Ok(&self.get(id)?.children)
    }

    /// Number of children.
    pub fn n_children(&self, id: ActorId) -> StageResult<usize> {
        Ok(self.get(id)?.children.len())
    }

    /// Child at `index`; negative indices count from the end.
    pub fn child_at_index(&self, parent: ActorId, index: isize) -> StageResult<Option<ActorId>> {
        let children = &self.get(parent)?.children;
        let n = children.len() as isize;
        let idx = if index < 0 { n + index } else { index };
        if !(0..n).contains(&idx) {
            return Ok(None);
        }
        Ok(Some(children[idx as usize]))
    }

    /// Bottom-most child.
    pub fn first_child(&self, id: ActorId) -> StageResult<Option<ActorId>> {
        Ok(self.get(id)?.children.first().copied())
    }

    /// Top-most child.
    pub fn last_child(&self, id: ActorId) -> StageResult<Option<ActorId>> {
        Ok(self.get(id)?.children.last().copied())
    }

    /// Sibling painted right after `id`.
    pub fn next_sibling(&self, id: ActorId) -> StageResult<Option<ActorId>> {
        self.sibling_at(id, 1)
    }

    /// Sibling painted right before `id`.
    pub fn previous_sibling(&self, id: ActorId) -> StageResult<Option<ActorId>> {
        self.sibling_at(id, -1)
    }

    fn sibling_at(&self, id: ActorId, delta: isize) -> StageResult<Option<ActorId>> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(None);
        };
        let siblings = &self.get(parent)?.children;
        let Some(pos) = siblings.iter().position(|&c| c == id) else {
            return Ok(None);
        };
        let target = pos as isize + delta;
        if target < 0 {
            return Ok(None);
        }
        Ok(siblings.get(target as usize).copied())
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: ActorId, id: ActorId) -> bool {
        let mut cur = Some(id);
        while let Some(a) = cur {
            if a == ancestor {
                return true;
            }
            cur = self.node(a).and_then(|n| n.parent);
        }
        false
    }

    /// Whether `id` is connected to the stage.
    pub fn is_on_stage(&self, id: ActorId) -> bool {
        self.contains(id) && self.is_ancestor(self.root, id)
    }

    // ---------------------------------------------------------------------------------------
    // Tree mutation
    // ---------------------------------------------------------------------------------------

    /// Append `child` on top of `parent`'s children.
    ///
    /// Fails with [`StageError::Structural`] when `child` already has a parent, is the stage,
    /// or is an ancestor of `parent`. The graph is left unchanged on error.
    pub fn add_child(&mut self, parent: ActorId, child: ActorId) -> StageResult<()> {
        self.attach(parent, child, InsertAt::Above(None))
    }

    /// Insert `child` at `index` in `parent`'s child list (clamped to the end).
    pub fn insert_child_at_index(
        &mut self,
        parent: ActorId,
        child: ActorId,
        index: usize,
    ) -> StageResult<()> {
        self.attach(parent, child, InsertAt::Index(index))
    }

    /// Insert `child` right above `sibling`, or on top when `sibling` is `None`.
    pub fn insert_child_above(
        &mut self,
        parent: ActorId,
        child: ActorId,
        sibling: Option<ActorId>,
    ) -> StageResult<()> {
        self.attach(parent, child, InsertAt::Above(sibling))
    }

    /// Insert `child` right below `sibling`, or at the bottom when `sibling` is `None`.
    pub fn insert_child_below(
        &mut self,
        parent: ActorId,
        child: ActorId,
        sibling: Option<ActorId>,
    ) -> StageResult<()> {
        self.attach(parent, child, InsertAt::Below(sibling))
    }

    fn check_attachable(&self, parent: ActorId, child: ActorId) -> StageResult<()> {
        self.get(parent)?;
        let node = self.get(child)?;
        if child == self.root {
            return Err(StageError::structural("the stage actor cannot be a child"));
        }
        if let Some(current) = node.parent {
            return Err(StageError::structural(format!(
                "{child:?} already has parent {current:?}; remove it first"
            )));
        }
        if self.is_ancestor(child, parent) {
            return Err(StageError::structural(format!(
                "adding {child:?} to {parent:?} would create a cycle"
            )));
        }
        Ok(())
    }

    fn sibling_index(&self, parent: ActorId, sibling: ActorId) -> StageResult<usize> {
        self.get(parent)?
            .children
            .iter()
            .position(|&c| c == sibling)
            .ok_or_else(|| {
                StageError::structural(format!("{sibling:?} is not a child of {parent:?}"))
            })
    }

    fn insertion_index(&self, parent: ActorId, at: InsertAt) -> StageResult<usize> {
        let len = self.get(parent)?.children.len();
        Ok(match at {
            InsertAt::Index(i) => i.min(len),
            InsertAt::Above(None) => len,
            InsertAt::Below(None) => 0,
            InsertAt::Above(Some(s)) => self.sibling_index(parent, s)? + 1,
            InsertAt::Below(Some(s)) => self.sibling_index(parent, s)?,
        })
    }

    fn attach(&mut self, parent: ActorId, child: ActorId, at: InsertAt) -> StageResult<()> {
        self.check_attachable(parent, child)?;
        let index = self.insertion_index(parent, at)?;
        self.get_mut(parent)?.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        self.notify(Notification::ChildAdded { parent, child });
        self.queue_relayout();
        Ok(())
    }

    fn detach_from_parent(&mut self, parent: ActorId, child: ActorId) -> StageResult<()> {
        let index = self.sibling_index(parent, child)?;
        self.get_mut(parent)?.children.remove(index);
        self.get_mut(child)?.parent = None;
        self.notify(Notification::ChildRemoved { parent, child });
        self.queue_relayout();
        Ok(())
    }

    /// Detach `child` from `parent`, handing ownership back to the caller.
    ///
    /// The remaining siblings keep their relative order.
    pub(crate) fn remove_child(&mut self, parent: ActorId, child: ActorId) -> StageResult<ActorId> {
        self.get(child)?;
        self.detach_from_parent(parent, child)?;
        Ok(child)
    }

    /// Detach every child of `parent`, returning them in their former order.
    pub(crate) fn remove_all_children(&mut self, parent: ActorId) -> StageResult<Vec<ActorId>> {
        let children = self.get(parent)?.children.clone();
        for &child in &children {
            self.detach_from_parent(parent, child)?;
        }
        Ok(children)
    }

    /// Put `new` where `old` was and detach `old`, returning it.
    pub(crate) fn replace_child(
        &mut self,
        parent: ActorId,
        old: ActorId,
        new: ActorId,
    ) -> StageResult<ActorId> {
        let index = self.sibling_index(parent, old)?;
        self.check_attachable(parent, new)?;
        self.detach_from_parent(parent, old)?;
        self.attach(parent, new, InsertAt::Index(index))?;
        Ok(old)
    }

    fn move_child(&mut self, parent: ActorId, child: ActorId, at: InsertAt) -> StageResult<()> {
        let from = self.sibling_index(parent, child)?;
        if let InsertAt::Above(Some(s)) | InsertAt::Below(Some(s)) = at {
            if s == child {
                return Ok(());
            }
            self.sibling_index(parent, s)?;
        }
        let children = &mut self.get_mut(parent)?.children;
        children.remove(from);
        let len = children.len();
        let index = match at {
            InsertAt::Index(i) => i.min(len),
            InsertAt::Above(None) => len,
            InsertAt::Below(None) => 0,
            InsertAt::Above(Some(s)) => children.iter().position(|&c| c == s).map_or(len, |p| p + 1),
            InsertAt::Below(Some(s)) => children.iter().position(|&c| c == s).unwrap_or(0),
        };
        children.insert(index, child);
        self.queue_relayout();
        Ok(())
    }

    /// Move `child` right above `sibling` (or to the top).
    pub fn set_child_above_sibling(
        &mut self,
        parent: ActorId,
        child: ActorId,
        sibling: Option<ActorId>,
    ) -> StageResult<()> {
        self.move_child(parent, child, InsertAt::Above(sibling))
    }

    /// Move `child` right below `sibling` (or to the bottom).
    pub fn set_child_below_sibling(
        &mut self,
        parent: ActorId,
        child: ActorId,
        sibling: Option<ActorId>,
    ) -> StageResult<()> {
        self.move_child(parent, child, InsertAt::Below(sibling))
    }

    /// Move `child` to `index` in its parent's child list.
    pub fn set_child_at_index(
        &mut self,
        parent: ActorId,
        child: ActorId,
        index: usize,
    ) -> StageResult<()> {
        self.move_child(parent, child, InsertAt::Index(index))
    }

    /// Raise `id` above `below`, or to the top of its siblings.
    pub fn raise(&mut self, id: ActorId, below: Option<ActorId>) -> StageResult<()> {
        let parent = self.attached_parent(id)?;
        self.move_child(parent, id, InsertAt::Above(below))
    }

    /// Lower `id` below `above`, or to the bottom of its siblings.
    pub fn lower(&mut self, id: ActorId, above: Option<ActorId>) -> StageResult<()> {
        let parent = self.attached_parent(id)?;
        self.move_child(parent, id, InsertAt::Below(above))
    }

    fn attached_parent(&self, id: ActorId) -> StageResult<ActorId> {
        self.get(id)?
            .parent
            .ok_or_else(|| StageError::structural(format!("{id:?} has no parent")))
    }

    // ---------------------------------------------------------------------------------------
    // Geometry and visual state
    // ---------------------------------------------------------------------------------------

    /// Fixed position used by the fixed layout.
    pub fn position(&self, id: ActorId) -> StageResult<Point> {
        let node = self.get(id)?;
        Ok(Point::new(node.fixed_x, node.fixed_y))
    }

    /// Set the fixed position.
    pub fn set_position(&mut self, id: ActorId, x: f64, y: f64) -> StageResult<()> {
        self.set_property(id, PropertyId::X, PropertyValue::Float(x))?;
        self.set_property(id, PropertyId::Y, PropertyValue::Float(y))
    }

    /// Explicitly requested size; overrides content and layout preferences.
    pub fn set_size(&mut self, id: ActorId, width: f64, height: f64) -> StageResult<()> {
        self.set_property(id, PropertyId::Width, PropertyValue::Float(width))?;
        self.set_property(id, PropertyId::Height, PropertyValue::Float(height))
    }

    /// Drop the explicit size so preferences apply again.
    pub fn clear_size(&mut self, id: ActorId) -> StageResult<()> {
        let node = self.get_mut(id)?;
        node.request_width = None;
        node.request_height = None;
        self.queue_relayout();
        Ok(())
    }

    /// Size of the current allocation.
    pub fn size(&self, id: ActorId) -> StageResult<Size> {
        Ok(self.get(id)?.allocation.size())
    }

    /// Box assigned by the last allocation pass, in the parent's coordinate space.
    pub fn allocation(&self, id: ActorId) -> StageResult<ActorBox> {
        Ok(self.get(id)?.allocation)
    }

    /// Whether the actor got an allocation during the most recent frame.
    pub fn has_allocation(&self, id: ActorId) -> StageResult<bool> {
        let node = self.get(id)?;
        Ok(node.has_allocation && node.allocated_frame == self.frame)
    }

    /// Actor margins.
    pub fn margin(&self, id: ActorId) -> StageResult<Margin> {
        Ok(self.get(id)?.margin)
    }

    /// Set all four margins.
    pub fn set_margin(&mut self, id: ActorId, margin: Margin) -> StageResult<()> {
        self.set_property(id, PropertyId::MarginLeft, margin.left.into())?;
        self.set_property(id, PropertyId::MarginRight, margin.right.into())?;
        self.set_property(id, PropertyId::MarginTop, margin.top.into())?;
        self.set_property(id, PropertyId::MarginBottom, margin.bottom.into())
    }

    /// Set the pivot point, normalized to the actor's size.
    pub fn set_pivot_point(&mut self, id: ActorId, x: f64, y: f64) -> StageResult<()> {
        self.set_property(id, PropertyId::PivotX, x.into())?;
        self.set_property(id, PropertyId::PivotY, y.into())
    }

    /// Set the scale factors around the pivot point.
    pub fn set_scale(&mut self, id: ActorId, sx: f64, sy: f64) -> StageResult<()> {
        self.set_property(id, PropertyId::ScaleX, sx.into())?;
        self.set_property(id, PropertyId::ScaleY, sy.into())
    }

    /// Current scale factors.
    pub fn scale(&self, id: ActorId) -> StageResult<(f64, f64)> {
        let node = self.get(id)?;
        Ok((node.scale_x, node.scale_y))
    }

    /// Set the rotation around the z axis in degrees.
    pub fn set_rotation(&mut self, id: ActorId, degrees: f64) -> StageResult<()> {
        self.set_property(id, PropertyId::RotationZ, degrees.into())
    }

    /// Set the z position (paint depth hint).
    pub fn set_depth(&mut self, id: ActorId, depth: f64) -> StageResult<()> {
        self.set_property(id, PropertyId::Depth, depth.into())
    }

    /// Actor opacity.
    pub fn opacity(&self, id: ActorId) -> StageResult<u8> {
        Ok(self.get(id)?.opacity)
    }

    /// Set the opacity.
    pub fn set_opacity(&mut self, id: ActorId, opacity: u8) -> StageResult<()> {
        self.set_property(id, PropertyId::Opacity, f64::from(opacity).into())
    }

    /// Set or clear the background color.
    pub fn set_background_color(&mut self, id: ActorId, color: Option<Color>) -> StageResult<()> {
        let node = self.get_mut(id)?;
        if node.background != color {
            node.background = color;
            self.notify(Notification::PropertyChanged {
                actor: id,
                property: PropertyId::BackgroundColor,
            });
        }
        Ok(())
    }

    /// Set or clear the border.
    pub fn set_border(&mut self, id: ActorId, color: Option<Color>, width: f64) -> StageResult<()> {
        let node = self.get_mut(id)?;
        node.border_color = color;
        self.set_property(id, PropertyId::BorderWidth, width.into())
    }

    /// Whether the actor is shown.
    pub fn is_visible(&self, id: ActorId) -> StageResult<bool> {
        Ok(self.get(id)?.visible)
    }

    /// Show or hide an actor; hidden actors are skipped by layout, picking and painting.
    pub fn set_visible(&mut self, id: ActorId, visible: bool) -> StageResult<()> {
        let node = self.get_mut(id)?;
        if node.visible != visible {
            node.visible = visible;
            self.queue_relayout();
        }
        Ok(())
    }

    /// Whether the actor takes part in pointer hit-testing.
    pub fn is_reactive(&self, id: ActorId) -> StageResult<bool> {
        Ok(self.get(id)?.reactive)
    }

    /// Make an actor eligible (or not) for pointer input.
    pub fn set_reactive(&mut self, id: ActorId, reactive: bool) -> StageResult<()> {
        self.get_mut(id)?.reactive = reactive;
        Ok(())
    }

    /// Clip children to this actor's allocation when picking and painting.
    pub fn set_clip_to_allocation(&mut self, id: ActorId, clip: bool) -> StageResult<()> {
        self.get_mut(id)?.clip_to_allocation = clip;
        Ok(())
    }

    /// Read a property.
    pub fn property(&self, id: ActorId, property: PropertyId) -> StageResult<PropertyValue> {
        let n = self.get(id)?;
        let v = match property {
            PropertyId::X => n.fixed_x,
            PropertyId::Y => n.fixed_y,
            PropertyId::Width => n.request_width.unwrap_or(n.allocation.width()),
            PropertyId::Height => n.request_height.unwrap_or(n.allocation.height()),
            PropertyId::Opacity => f64::from(n.opacity),
            PropertyId::ScaleX => n.scale_x,
            PropertyId::ScaleY => n.scale_y,
            PropertyId::RotationZ => n.rotation_z,
            PropertyId::PivotX => n.pivot_x,
            PropertyId::PivotY => n.pivot_y,
            PropertyId::Depth => n.depth,
            PropertyId::BackgroundColor => {
                return Ok(PropertyValue::Color(n.background.unwrap_or_default()));
            }
            PropertyId::BorderColor => {
                return Ok(PropertyValue::Color(n.border_color.unwrap_or_default()));
            }
            PropertyId::BorderWidth => n.border_width,
            PropertyId::ScrollX => n.scroll_x,
            PropertyId::ScrollY => n.scroll_y,
            PropertyId::MarginLeft => n.margin.left,
            PropertyId::MarginRight => n.margin.right,
            PropertyId::MarginTop => n.margin.top,
            PropertyId::MarginBottom => n.margin.bottom,
        };
        Ok(PropertyValue::Float(v))
    }

    /// Write a property. The value kind must match the property.
    pub fn set_property(
        &mut self,
        id: ActorId,
        property: PropertyId,
        value: PropertyValue,
    ) -> StageResult<()> {
        if value.kind() != property.kind() {
            return Err(StageError::config(format!(
                "property \"{property}\" expects {:?}, got {:?}",
                property.kind(),
                value.kind()
            )));
        }
        let n = self.get_mut(id)?;
        let changed = match (property, value) {
            (PropertyId::BackgroundColor, PropertyValue::Color(c)) => {
                replace(&mut n.background, Some(c))
            }
            (PropertyId::BorderColor, PropertyValue::Color(c)) => {
                replace(&mut n.border_color, Some(c))
            }
            (p, PropertyValue::Float(v)) => {
                if !v.is_finite() {
                    return Err(StageError::config(format!(
                        "property \"{p}\" must be finite, got {v}"
                    )));
                }
                match p {
                    PropertyId::X => replace(&mut n.fixed_x, v),
                    PropertyId::Y => replace(&mut n.fixed_y, v),
                    PropertyId::Width => replace(&mut n.request_width, Some(v.max(0.0))),
                    PropertyId::Height => replace(&mut n.request_height, Some(v.max(0.0))),
                    PropertyId::Opacity => replace(&mut n.opacity, v.round().clamp(0.0, 255.0) as u8),
                    PropertyId::ScaleX => replace(&mut n.scale_x, v),
                    PropertyId::ScaleY => replace(&mut n.scale_y, v),
                    PropertyId::RotationZ => replace(&mut n.rotation_z, v),
                    PropertyId::PivotX => replace(&mut n.pivot_x, v),
                    PropertyId::PivotY => replace(&mut n.pivot_y, v),
                    PropertyId::Depth => replace(&mut n.depth, v),
                    PropertyId::BorderWidth => replace(&mut n.border_width, v.max(0.0)),
                    PropertyId::ScrollX => replace(&mut n.scroll_x, v),
                    PropertyId::ScrollY => replace(&mut n.scroll_y, v),
                    PropertyId::MarginLeft => replace(&mut n.margin.left, v),
                    PropertyId::MarginRight => replace(&mut n.margin.right, v),
                    PropertyId::MarginTop => replace(&mut n.margin.top, v),
                    PropertyId::MarginBottom => replace(&mut n.margin.bottom, v),
                    PropertyId::BackgroundColor | PropertyId::BorderColor => false,
                }
            }
            (_, PropertyValue::Color(_)) => false,
        };
        if changed {
            self.notify(Notification::PropertyChanged {
                actor: id,
                property,
            });
            if property.affects_layout() {
                self.queue_relayout();
            }
        }
        Ok(())
    }

    /// Write a property addressed by name.
    pub fn set_property_by_name(
        &mut self,
        id: ActorId,
        name: &str,
        value: PropertyValue,
    ) -> StageResult<()> {
        self.set_property(id, PropertyId::from_name(name)?, value)
    }

    // ---------------------------------------------------------------------------------------
    // Layout
    // ---------------------------------------------------------------------------------------

    /// Attach a layout manager to a container, replacing the previous one.
    pub fn set_layout_manager(
        &mut self,
        id: ActorId,
        layout: Box<dyn LayoutManager>,
    ) -> StageResult<()> {
        self.get_mut(id)?.layout = layout;
        self.layout_changed(id);
        Ok(())
    }

    /// The container's layout manager.
    pub fn layout_manager(&self, id: ActorId) -> StageResult<&dyn LayoutManager> {
        Ok(self.get(id)?.layout.as_ref())
    }

    /// Reconfigure a container's layout manager of concrete type `L`.
    ///
    /// The container is notified and its layout invalidated.
    pub fn with_layout_mut<L, R>(&mut self, id: ActorId, f: impl FnOnce(&mut L) -> R) -> StageResult<R>
    where
        L: LayoutManager,
    {
        let node = self.get_mut(id)?;
        let name = node.layout.name();
        let layout = node.layout.as_any_mut().downcast_mut::<L>().ok_or_else(|| {
            StageError::config(format!("{id:?} uses a \"{name}\" layout of another type"))
        })?;
        let out = f(layout);
        self.layout_changed(id);
        Ok(out)
    }

    /// Set a layout manager property by name.
    pub fn set_layout_property(
        &mut self,
        id: ActorId,
        name: &str,
        value: &serde_json::Value,
    ) -> StageResult<()> {
        self.get_mut(id)?.layout.set_property(name, value)?;
        self.layout_changed(id);
        Ok(())
    }

    fn layout_changed(&mut self, container: ActorId) {
        self.notify(Notification::LayoutChanged { container });
        self.queue_relayout();
    }

    /// Per-child layout properties.
    pub fn child_layout(&self, id: ActorId) -> StageResult<ChildLayoutProps> {
        Ok(self.get(id)?.layout_props)
    }

    /// Replace per-child layout properties.
    pub fn set_child_layout(&mut self, id: ActorId, props: ChildLayoutProps) -> StageResult<()> {
        self.get_mut(id)?.layout_props = props;
        self.queue_relayout();
        Ok(())
    }

    /// Set one per-child layout property (`expand`, `x-align`, `y-align`) by name.
    pub fn set_child_layout_property(
        &mut self,
        id: ActorId,
        name: &str,
        value: &serde_json::Value,
    ) -> StageResult<()> {
        let mut props = self.child_layout(id)?;
        match name.replace('_', "-").as_str() {
            "expand" => props.expand = crate::layout::expect_bool(name, value)?,
            "x-align" => {
                props.x_align = Some(LayoutAlign::parse(crate::layout::expect_str(name, value)?)?)
            }
            "y-align" => {
                props.y_align = Some(LayoutAlign::parse(crate::layout::expect_str(name, value)?)?)
            }
            _ => {
                return Err(StageError::config(format!(
                    "unknown child layout property \"{name}\""
                )));
            }
        }
        self.set_child_layout(id, props)
    }

    /// Preferred width including margins.
    pub fn preferred_width(&self, id: ActorId, for_height: Option<f64>) -> StageResult<SizeRequest> {
        self.get(id)?;
        Ok(self.child_width(id, for_height))
    }

    /// Preferred height including margins.
    pub fn preferred_height(&self, id: ActorId, for_width: Option<f64>) -> StageResult<SizeRequest> {
        self.get(id)?;
        Ok(self.child_height(id, for_width))
    }

    pub(crate) fn child_width(&self, id: ActorId, for_height: Option<f64>) -> SizeRequest {
        let Some(n) = self.node(id) else {
            return SizeRequest::default();
        };
        let inner = for_height.map(|h| (h - n.margin.vertical()).max(0.0));
        let req = if let Some(w) = n.request_width {
            SizeRequest::fixed(w)
        } else if !n.children.is_empty() {
            n.layout.preferred_width(self, id, inner)
        } else if let Some(size) = n.content.and_then(|c| self.content.preferred_size(c)) {
            SizeRequest::fixed(size.width)
        } else {
            SizeRequest::default()
        };
        req.grow(n.margin.horizontal())
    }

    pub(crate) fn child_height(&self, id: ActorId, for_width: Option<f64>) -> SizeRequest {
        let Some(n) = self.node(id) else {
            return SizeRequest::default();
        };
        let inner = for_width.map(|w| (w - n.margin.horizontal()).max(0.0));
        let req = if let Some(h) = n.request_height {
            SizeRequest::fixed(h)
        } else if !n.children.is_empty() {
            n.layout.preferred_height(self, id, inner)
        } else if let Some(size) = n.content.and_then(|c| self.content.preferred_size(c)) {
            SizeRequest::fixed(size.height)
        } else {
            SizeRequest::default()
        };
        req.grow(n.margin.vertical())
    }

    pub(crate) fn visible_children(&self, id: ActorId) -> Vec<ActorId> {
        self.node(id)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|&c| self.node(c).is_some_and(|cn| cn.visible))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------------------------------
    // Transforms
    // ---------------------------------------------------------------------------------------

    pub(crate) fn local_transform(node: &ActorNode) -> Affine {
        let a = node.allocation;
        let px = node.pivot_x * a.width();
        let py = node.pivot_y * a.height();
        Affine::translate((a.x0 + px, a.y0 + py))
            * Affine::rotate(node.rotation_z.to_radians())
            * Affine::scale_non_uniform(node.scale_x, node.scale_y)
            * Affine::translate((-px, -py))
    }

    /// Transform from `id`'s local coordinates to stage coordinates.
    ///
    /// Includes every ancestor's allocation origin, pivot-relative scale and rotation, and
    /// the scroll offset of scrolling ancestors.
    pub fn stage_transform(&self, id: ActorId) -> StageResult<Affine> {
        let node = self.get(id)?;
        let local = Self::local_transform(node);
        match node.parent {
            None => Ok(local),
            Some(parent) => {
                let pn = self.get(parent)?;
                let scroll = Affine::translate((-pn.scroll_x, -pn.scroll_y));
                Ok(self.stage_transform(parent)? * scroll * local)
            }
        }
    }

    /// Map a stage point into `id`'s local space; `None` when the transform is degenerate.
    pub fn transform_stage_point(&self, id: ActorId, point: Point) -> StageResult<Option<Point>> {
        let t = self.stage_transform(id)?;
        if t.determinant().abs() < 1e-12 {
            return Ok(None);
        }
        Ok(Some(t.inverse() * point))
    }

    /// Bounding box of the transformed allocation, in stage coordinates.
    pub fn paint_box(&self, id: ActorId) -> StageResult<Rect> {
        let size = self.get(id)?.allocation.size();
        let t = self.stage_transform(id)?;
        Ok(t.transform_rect_bbox(Rect::from_origin_size(Point::ORIGIN, size)))
    }

    // ---------------------------------------------------------------------------------------
    // Scrolling
    // ---------------------------------------------------------------------------------------

    /// Enable scrolling of children along the given axes.
    pub fn set_scroll_mode(&mut self, id: ActorId, mode: ScrollMode) -> StageResult<()> {
        self.get_mut(id)?.scroll_mode = mode;
        Ok(())
    }

    /// Scroll axes of a container.
    pub fn scroll_mode(&self, id: ActorId) -> StageResult<ScrollMode> {
        Ok(self.get(id)?.scroll_mode)
    }

    /// Current scroll offset applied to children.
    pub fn scroll_offset(&self, id: ActorId) -> StageResult<Vec2> {
        let node = self.get(id)?;
        Ok(Vec2::new(node.scroll_x, node.scroll_y))
    }

    // ---------------------------------------------------------------------------------------
    // Implicit animation state
    // ---------------------------------------------------------------------------------------

    /// Push a new easing state (250ms, ease-out-cubic) for implicit animations.
    pub fn save_easing_state(&mut self, id: ActorId) -> StageResult<()> {
        self.push_easing_state(
            id,
            EasingState {
                duration_ms: 250.0,
                ..EasingState::default()
            },
        )
    }

    pub(crate) fn push_easing_state(&mut self, id: ActorId, state: EasingState) -> StageResult<()> {
        self.get_mut(id)?.easing_stack.push(state);
        Ok(())
    }

    /// Pop the easing state pushed by [`SceneGraph::save_easing_state`].
    pub fn restore_easing_state(&mut self, id: ActorId) -> StageResult<()> {
        let node = self.get_mut(id)?;
        if node.easing_stack.len() <= 1 {
            return Err(StageError::config(format!(
                "{id:?} has no saved easing state to restore"
            )));
        }
        node.easing_stack.pop();
        Ok(())
    }

    /// Active easing state.
    pub fn easing_state(&self, id: ActorId) -> StageResult<EasingState> {
        Ok(self.get(id)?.easing())
    }

    /// Set the implicit animation duration.
    pub fn set_easing_duration(&mut self, id: ActorId, duration_ms: f64) -> StageResult<()> {
        self.get_mut(id)?.easing_mut().duration_ms = duration_ms.max(0.0);
        Ok(())
    }

    /// Set the implicit animation delay.
    pub fn set_easing_delay(&mut self, id: ActorId, delay_ms: f64) -> StageResult<()> {
        self.get_mut(id)?.easing_mut().delay_ms = delay_ms.max(0.0);
        Ok(())
    }

    /// Set the implicit animation easing mode.
    pub fn set_easing_mode(
        &mut self,
        id: ActorId,
        mode: crate::animation::ease::EasingMode,
    ) -> StageResult<()> {
        self.get_mut(id)?.easing_mut().mode = mode;
        Ok(())
    }

    // ---------------------------------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------------------------------

    /// Shared content objects.
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// Mutable access for creating content objects.
    pub fn content_mut(&mut self) -> &mut ContentStore {
        &mut self.content
    }

    /// Attach (or detach with `None`) a content object. An unowned object is claimed.
    pub fn set_content(&mut self, id: ActorId, content: Option<ContentId>) -> StageResult<()> {
        if let Some(c) = content {
            self.content.kind(c)?;
        }
        let previous = self.get(id)?.content;
        if previous == content {
            return Ok(());
        }
        if let Some(old) = previous {
            self.content.detach(old, id);
        }
        if let Some(new) = content {
            self.content.attach(new, id)?;
        }
        self.get_mut(id)?.content = content;
        self.queue_relayout();
        Ok(())
    }

    /// Content object shown by `id`.
    pub fn content_of(&self, id: ActorId) -> StageResult<Option<ContentId>> {
        Ok(self.get(id)?.content)
    }

    /// Invalidate the content shown by `id`; fails unless `id` owns it.
    pub fn invalidate_content(&mut self, id: ActorId) -> StageResult<u64> {
        let content = self
            .get(id)?
            .content
            .ok_or_else(|| StageError::content(format!("{id:?} has no content")))?;
        self.content.invalidate(content, id)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
