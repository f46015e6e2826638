//! The observer agent: holds the model's global variables.

use tw_core::{AgentKind, EngineError, EngineResult, Value};

use crate::schema::VarSchema;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observer {
    globals: Vec<Value>,
}

impl Observer {
    pub fn new(globals: &VarSchema) -> Self {
        Observer { globals: globals.zeroed() }
    }

    #[inline]
    pub fn var_count(&self) -> usize {
        self.globals.len()
    }

    pub fn get_variable(&self, vn: usize) -> EngineResult<Value> {
        self.globals
            .get(vn)
            .cloned()
            .ok_or(EngineError::NoSuchVariable { kind: AgentKind::Observer, index: vn })
    }

    pub fn set_variable(&mut self, vn: usize, value: Value) -> EngineResult<()> {
        let slot = self
            .globals
            .get_mut(vn)
            .ok_or(EngineError::NoSuchVariable { kind: AgentKind::Observer, index: vn })?;
        *slot = value;
        Ok(())
    }

    /// Zero every global.
    pub fn clear(&mut self) {
        self.globals.iter_mut().for_each(|v| *v = Value::ZERO);
    }
}
