//! Property-based tests for normalization, signatures and generation
//!
//! Uses proptest to generate counts, parameter lists and seeds

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stubgen::{
    normalize, CallArgs, Double, GenerationRequest, Generator, ParameterCategory,
    ParameterSignature, ParameterSpec, RandomGenerator, TypeDescriptor, Value,
    RANDOM_TEXT_LENGTH,
};

proptest! {
    #[test]
    fn test_count_yields_exactly_n_methods(n in 1i64..200) {
        let entries = normalize(Some(&Value::Int(n))).unwrap();
        prop_assert_eq!(entries.len() as i64, n);
        for (i, entry) in entries.iter().enumerate() {
            prop_assert_eq!(&entry.name, &format!("method{}", i + 1));
        }
    }

    #[test]
    fn test_non_positive_count_yields_nothing(n in i64::MIN..=0) {
        prop_assert!(normalize(Some(&Value::Int(n))).unwrap().is_empty());
    }

    #[test]
    fn test_signature_order_is_canonical(params in any_parameter_list()) {
        let rendered = ParameterSignature::validate(&params).unwrap().render();
        let mut last = 0;
        for category in ParameterCategory::CANONICAL_ORDER {
            for param in params.iter().filter(|p| p.category == category) {
                let position = rendered.find(&fragment_head(param)).unwrap();
                prop_assert!(position >= last, "{} out of order in {}", param.name, rendered);
                last = position;
            }
        }
    }

    #[test]
    fn test_signature_independent_of_input_order(
        params in any_parameter_list(),
        seed in any::<u64>()
    ) {
        let mut shuffled = params.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        rand::seq::SliceRandom::shuffle(shuffled.as_mut_slice(), &mut rng);
        let a = ParameterSignature::validate(&params).unwrap();
        let b = ParameterSignature::validate(&shuffled).unwrap();
        // Groups keep input order within a category, so compare them sorted
        prop_assert_eq!(sorted_groups(&a), sorted_groups(&b));
        prop_assert_eq!(sorted_groups(&a), expected_groups(&params));
    }

    #[test]
    fn test_generated_integers_non_negative(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let value = RandomGenerator::new(&mut rng).generate(&TypeDescriptor::Integer).unwrap();
        prop_assert!(value.as_int().unwrap() >= 0);
    }

    #[test]
    fn test_generated_text_is_alphanumeric(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut generator = RandomGenerator::new(&mut rng);
        for kind in [TypeDescriptor::String, TypeDescriptor::Symbol] {
            let value = generator.generate(&kind).unwrap();
            let text = value.as_text().unwrap();
            prop_assert_eq!(text.len(), RANDOM_TEXT_LENGTH);
            prop_assert!(text.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_unsigned_methods_ignore_arguments(
        positional in prop::collection::vec(any::<i64>(), 0..5),
        literal in any::<i64>()
    ) {
        let request = GenerationRequest::new()
            .with_public_methods("call_me")
            .with_return_value(literal);
        let mut double = Double::new("Subject");
        Generator::new(request).generate(&mut double).unwrap();

        let args = positional
            .into_iter()
            .fold(CallArgs::new(), |args, v| args.arg(v));
        prop_assert_eq!(double.call("call_me", &args).unwrap(), Value::Int(literal));
    }
}

/// Valid parameter lists: unique names, at most one block
fn any_parameter_list() -> impl Strategy<Value = Vec<ParameterSpec>> {
    (
        0usize..3,
        0usize..3,
        0usize..3,
        0usize..3,
        any::<bool>(),
        any::<i64>(),
    )
        .prop_map(|(req, opt, keyreq, key, block, default)| {
            let mut params = Vec::new();
            params.extend((0..req).map(|i| ParameterSpec::required(format!("r{}", i))));
            params.extend((0..opt).map(|i| ParameterSpec::optional(format!("o{}", i), default)));
            params.extend((0..keyreq).map(|i| ParameterSpec::keyword(format!("k{}", i))));
            params.extend(
                (0..key).map(|i| ParameterSpec::keyword_optional(format!("ko{}", i), default)),
            );
            if block {
                params.push(ParameterSpec::block("blk"));
            }
            params.reverse();
            params
        })
}

/// Rendered fragments per category, sorted within each category
fn sorted_groups(signature: &ParameterSignature) -> Vec<Vec<String>> {
    let with_default = |pairs: &[(String, Value)], separator: &str| -> Vec<String> {
        pairs
            .iter()
            .map(|(name, default)| format!("{}{}{}", name, separator, default))
            .collect()
    };
    let mut groups = vec![
        signature.required().to_vec(),
        with_default(signature.optional(), "="),
        signature.keyword_required().to_vec(),
        with_default(signature.keyword_optional(), ": "),
        signature.block().map(str::to_string).into_iter().collect(),
    ];
    for group in &mut groups {
        group.sort();
    }
    groups
}

/// The same fragments built straight from the input list
fn expected_groups(params: &[ParameterSpec]) -> Vec<Vec<String>> {
    ParameterCategory::CANONICAL_ORDER
        .iter()
        .map(|category| {
            let mut group: Vec<String> = params
                .iter()
                .filter(|p| p.category == *category)
                .map(|p| match (&p.category, &p.default) {
                    (ParameterCategory::PositionalOptional, Some(d)) => {
                        format!("{}={}", p.name, d)
                    }
                    (ParameterCategory::KeywordOptional, Some(d)) => format!("{}: {}", p.name, d),
                    _ => p.name.clone(),
                })
                .collect();
            group.sort();
            group
        })
        .collect()
}

/// Start of a parameter's rendered fragment, unique within a signature
fn fragment_head(param: &ParameterSpec) -> String {
    match param.category {
        ParameterCategory::PositionalRequired => param.name.clone(),
        ParameterCategory::PositionalOptional => format!("{}=", param.name),
        ParameterCategory::KeywordRequired => format!("{}:", param.name),
        ParameterCategory::KeywordOptional => format!("{}: ", param.name),
        ParameterCategory::Block => format!("&{}", param.name),
    }
}
