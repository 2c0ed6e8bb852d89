//! Method synthesis — the `generate` entry point
//!
//! For each group, in the order public instance, public type, private
//! instance, private type:
//!
//! ```text
//! raw group ──► MethodGroup ──► MethodEntry ─┬─► ParameterSignature ─┐
//!                                            └─► resolved Value ─────┴─► GeneratedMethod ──► target
//! ```
//!
//! The first error stops generation. Methods attached before it stay
//! attached.

use crate::double::{GeneratedMethod, StubTarget};
use crate::error::Result;
use crate::normalize::{MethodEntry, MethodGroup};
use crate::resolve::resolve_return_value;
use crate::signature::ParameterSignature;
use crate::spec::{GenerationRequest, GroupKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Generate every method in `request` onto `target`
pub fn generate<T: StubTarget>(request: &GenerationRequest, target: &mut T) -> Result<()> {
    Generator::new(request.clone()).generate(target)
}

/// Synthesizes methods from a request
#[derive(Debug, Clone)]
pub struct Generator {
    request: GenerationRequest,
}

impl Generator {
    pub fn new(request: GenerationRequest) -> Self {
        Self { request }
    }

    /// Attach all four groups, seeding randomness from the request
    pub fn generate<T: StubTarget>(&self, target: &mut T) -> Result<()> {
        let mut rng = match self.request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with_rng(target, &mut rng)
    }

    /// Attach all four groups using the given random source
    pub fn generate_with_rng<T: StubTarget, R: Rng>(
        &self,
        target: &mut T,
        rng: &mut R,
    ) -> Result<()> {
        for kind in GroupKind::ALL {
            let attached = self.generate_group(kind, target, rng)?;
            debug!(group = %kind, attached, "method group generated");
        }
        Ok(())
    }

    fn generate_group<T: StubTarget, R: Rng>(
        &self,
        kind: GroupKind,
        target: &mut T,
        rng: &mut R,
    ) -> Result<usize> {
        let group = MethodGroup::from_value(self.request.group(kind))?;
        let mut attached = 0;
        for entry in group.entries() {
            let method = self.synthesize(kind, &entry?, rng)?;
            debug!(group = %kind, method = %method.definition(), "attaching method");
            target.define_method(kind.scope(), method);
            attached += 1;
        }
        Ok(attached)
    }

    /// Build the method for one entry of a group
    pub fn synthesize<R: Rng>(
        &self,
        kind: GroupKind,
        entry: &MethodEntry,
        rng: &mut R,
    ) -> Result<GeneratedMethod> {
        let signature = entry
            .parameters()
            .map(ParameterSignature::parse)
            .transpose()?;

        let value = resolve_return_value(
            entry.return_value(self.request.return_value.as_ref()),
            entry.generate(self.request.generate),
            rng,
        )?;
        trace!(method = %entry.name, value = %value, "resolved return value");

        Ok(GeneratedMethod::new(
            entry.name.clone(),
            kind.visibility(),
            signature,
            value,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::double::{Scope, Visibility};
    use crate::error::Error;
    use crate::signature::ParameterSpec;
    use crate::spec::{entry, EntryOptions};
    use crate::value::{TypeDescriptor, Value};

    /// Records every definition in order
    #[derive(Default)]
    struct Recorder {
        defined: Vec<(Scope, GeneratedMethod)>,
    }

    impl StubTarget for Recorder {
        fn define_method(&mut self, scope: Scope, method: GeneratedMethod) {
            self.defined.push((scope, method));
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    #[test]
    fn test_groups_in_order_with_scope_and_visibility() {
        let request = GenerationRequest::new()
            .with_private_type_methods("d")
            .with_private_methods("c")
            .with_public_type_methods("b")
            .with_public_methods("a");
        let mut target = Recorder::default();
        Generator::new(request)
            .generate_with_rng(&mut target, &mut rng())
            .unwrap();

        let seen: Vec<_> = target
            .defined
            .iter()
            .map(|(scope, m)| (m.name(), *scope, m.visibility()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("a", Scope::Instance, Visibility::Public),
                ("b", Scope::Type, Visibility::Public),
                ("c", Scope::Instance, Visibility::Private),
                ("d", Scope::Type, Visibility::Private),
            ]
        );
    }

    #[test]
    fn test_global_settings_apply_to_bare_entries() {
        let request = GenerationRequest::new()
            .with_public_methods(2)
            .with_return_value("X");
        let mut target = Recorder::default();
        Generator::new(request)
            .generate_with_rng(&mut target, &mut rng())
            .unwrap();
        assert!(target
            .defined
            .iter()
            .all(|(_, m)| m.value() == &Value::from("X")));
    }

    #[test]
    fn test_entry_override_is_not_merged() {
        let request = GenerationRequest::new()
            .with_public_methods(vec![entry(
                "id",
                EntryOptions::new()
                    .with_return_value(TypeDescriptor::Integer)
                    .with_generate(true),
            )])
            .with_return_value("X")
            .with_generate(false);
        let mut target = Recorder::default();
        Generator::new(request)
            .generate_with_rng(&mut target, &mut rng())
            .unwrap();
        let value = target.defined[0].1.value();
        assert!(value.as_int().is_some_and(|i| i >= 0), "got {:?}", value);
    }

    #[test]
    fn test_parameters_become_signature() {
        let request = GenerationRequest::new().with_public_methods(vec![entry(
            "find",
            EntryOptions::new().with_parameters([
                ParameterSpec::optional("b", 1),
                ParameterSpec::required("a"),
            ]),
        )]);
        let mut target = Recorder::default();
        Generator::new(request)
            .generate_with_rng(&mut target, &mut rng())
            .unwrap();
        assert_eq!(target.defined[0].1.definition(), "find(a, b=1)");
    }

    #[test]
    fn test_error_keeps_earlier_methods() {
        let request = GenerationRequest::new()
            .with_public_methods(vec![
                Value::from("ok"),
                entry(
                    "bad",
                    EntryOptions::new().with_parameters([
                        ParameterSpec::block("a"),
                        ParameterSpec::block("b"),
                    ]),
                ),
                Value::from("never"),
            ])
            .with_private_methods("also_never");
        let mut target = Recorder::default();
        let err = Generator::new(request)
            .generate_with_rng(&mut target, &mut rng())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameterList(_)));
        let names: Vec<_> = target.defined.iter().map(|(_, m)| m.name()).collect();
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn test_seed_makes_generation_reproducible() {
        let request = GenerationRequest::new()
            .with_public_methods(3)
            .with_return_value(TypeDescriptor::String)
            .with_generate(true)
            .with_seed(1234);
        let mut first = Recorder::default();
        let mut second = Recorder::default();
        Generator::new(request.clone()).generate(&mut first).unwrap();
        generate(&request, &mut second).unwrap();
        let values = |r: &Recorder| -> Vec<Value> {
            r.defined.iter().map(|(_, m)| m.value().clone()).collect()
        };
        assert_eq!(values(&first), values(&second));
    }
}
