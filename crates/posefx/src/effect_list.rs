use crate::{Canvas, Effect, EffectKind, PerceptionFrame};
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

/// Ordered effects; later entries draw over earlier ones.
///
/// The same kind may appear any number of times.
#[derive(Default)]
pub struct EffectList {
    effects: Vec<Box<dyn Effect>>,
}

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    /// Drop every effect along with its history.
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Effect> {
        self.effects.iter().map(|effect| effect.as_ref())
    }

    /// How many effects of `kind` are in the list.
    pub fn count(&self, kind: EffectKind) -> usize {
        self.iter().filter(|effect| effect.kind() == kind).count()
    }

    pub fn kinds(&self) -> Vec<EffectKind> {
        self.iter().map(|effect| effect.kind()).collect()
    }

    /// Feed `frame` to every effect in list order.
    pub fn render(&mut self, frame: &Arc<PerceptionFrame>, canvas: &mut dyn Canvas) {
        for effect in self.effects.iter_mut() {
            effect.on_frame(frame, canvas);
        }
    }
}

impl fmt::Debug for EffectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

/// Handle to the one effect list shared by the render loop and the listener
/// bridge.
///
/// Every access holds the lock for the full operation: a mutation lands
/// either before or after a tick's drawing pass, never in the middle of it.
#[derive(Clone, Default)]
pub struct SharedEffects {
    inner: Arc<Mutex<EffectList>>,
}

impl SharedEffects {
    pub fn new(list: EffectList) -> Self {
        Self {
            inner: Arc::new(Mutex::new(list)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EffectList> {
        // an effect panicking mid-draw leaves the list itself intact
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the list as one step.
    pub fn apply<R>(&self, f: impl FnOnce(&mut EffectList) -> R) -> R {
        f(&mut self.lock())
    }

    /// Draw one frame through every effect. Returns how many effects ran.
    pub fn render(&self, frame: &Arc<PerceptionFrame>, canvas: &mut dyn Canvas) -> usize {
        let mut list = self.lock();
        list.render(frame, canvas);
        list.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn kinds(&self) -> Vec<EffectKind> {
        self.lock().kinds()
    }
}

impl fmt::Debug for SharedEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedEffects").field(&*self.lock()).finish()
    }
}
