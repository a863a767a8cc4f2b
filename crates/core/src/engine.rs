//! The `Engine` trait: the step-and-observe surface collaborators program against.
//!
//! The trait is object-safe so a UI or exporter can hold a `dyn Engine`
//! without knowing which kinetics model is running.

use crate::error::EngineError;
use crate::field::Field;
use serde_json::Value;

/// A step-based simulation producing a scalar [`Field`] for display.
pub trait Engine {
    /// Advance the simulation by one sub-step.
    fn step(&mut self) -> Result<(), EngineError>;

    /// The field that gets rendered (the activator channel).
    fn field(&self) -> &Field;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every tunable: type, range, default, description.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Engine that decays its field toward zero, for exercising the trait.
    struct Decay {
        field: Field,
        rate: f64,
    }

    impl Engine for Decay {
        fn step(&mut self) -> Result<(), EngineError> {
            let keep = 1.0 - self.rate;
            self.field.data_mut().iter_mut().for_each(|v| *v *= keep);
            Ok(())
        }

        fn field(&self) -> &Field {
            &self.field
        }

        fn params(&self) -> Value {
            json!({"rate": self.rate})
        }

        fn param_schema(&self) -> Value {
            json!({"rate": {"type": "number", "default": 0.5, "min": 0.0, "max": 1.0}})
        }
    }

    fn decay() -> Decay {
        Decay {
            field: Field::filled(4, 4, 1.0).unwrap(),
            rate: 0.5,
        }
    }

    #[test]
    fn engine_trait_is_object_safe() {
        let mut engine: Box<dyn Engine> = Box::new(decay());
        engine.step().unwrap();
        assert!((engine.field().get(0, 0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn params_and_schema_agree_on_keys() {
        let engine = decay();
        let params = engine.params();
        let schema = engine.param_schema();
        for key in params.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }
}
