//! Per-parameter "locally editing" flags.
//!
//! Set when the user grabs a control and cleared on release. While set,
//! parameter changes coming back from the engine are not applied to that
//! control, so a drag never fights its own echo.

use crosstalk_core::ParamIndex;

#[derive(Debug, Clone, Default)]
pub struct EditState {
    editing: Vec<bool>,
}

impl EditState {
    pub fn new(param_count: usize) -> Self {
        Self {
            editing: vec![false; param_count],
        }
    }

    pub fn begin(&mut self, param: ParamIndex) {
        let i = param.index();
        if i >= self.editing.len() {
            self.editing.resize(i + 1, false);
        }
        self.editing[i] = true;
    }

    pub fn end(&mut self, param: ParamIndex) {
        if let Some(flag) = self.editing.get_mut(param.index()) {
            *flag = false;
        }
    }

    #[inline]
    pub fn is_editing(&self, param: ParamIndex) -> bool {
        self.editing.get(param.index()).copied().unwrap_or(false)
    }

    pub fn any(&self) -> bool {
        self.editing.iter().any(|&e| e)
    }

    pub fn clear(&mut self) {
        self.editing.iter_mut().for_each(|e| *e = false);
    }
}
