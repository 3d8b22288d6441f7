//! End-to-end properties of a full generation run.

use pretty_assertions::assert_eq;

use cotejar::suite::{RustBackend, Session, Summary};

fn generate() -> (String, Summary) {
    let mut out = Vec::new();
    let summary = Session::new()
        .generate(&RustBackend::default(), &mut out)
        .expect("generation succeeds");
    (String::from_utf8(out).expect("suite is utf-8"), summary)
}

/// Extract the body of one test case by its function name.
fn case_body<'a>(suite: &'a str, name: &str) -> &'a str {
    let open = format!("fn {name}() {{");
    let start = suite.find(&open).unwrap_or_else(|| panic!("case `{name}` missing"));
    let rest = &suite[start..];
    let end = rest.find("\n    }").expect("case terminates");
    &rest[..end]
}

#[test]
fn generation_is_byte_identical_across_runs() {
    let (first, _) = generate();
    let (second, _) = generate();
    assert_eq!(first, second);
}

#[test]
fn add_operator_case_matches_contract() {
    // The both-array `add` case: two operand declarations, two input
    // verification blocks, one `+` invocation, one output block, seed first.
    let (suite, _) = generate();
    let body = case_body(&suite, "test_add_op");

    let seed_pos = body.find("Stream::seed(").expect("seed pin present");
    let a_pos = body.find("let a = stream.normal(&[4, 3]);").expect("lhs declared");
    let b_pos = body.find("let b = stream.normal(&[4, 3]);").expect("rhs declared");
    assert!(seed_pos < a_pos && a_pos < b_pos, "seed must precede operands");

    assert_eq!(body.matches("assert_eq!(a.shape(), [4, 3]);").count(), 1);
    assert_eq!(body.matches("assert_eq!(b.shape(), [4, 3]);").count(), 1);
    assert_eq!(body.matches("let result = &a + &b;").count(), 1);
    assert_eq!(body.matches("assert_eq!(result.shape(), [4, 3]);").count(), 1);
}

#[test]
fn comparison_cases_render_boolean_reductions_only() {
    let (suite, _) = generate();
    let body = case_body(&suite, "test_equal_op");
    assert!(body.contains("let result = a.eq(&b);"));
    assert!(body.contains("assert_eq!(result.all(),"));
    assert!(body.contains("assert_eq!(result.any(),"));
    assert!(!body.contains("result.mean()"));
    assert!(!body.contains("result.sum()"));
}

#[test]
fn every_tolerance_is_two_percent_of_the_statistic() {
    let (suite, _) = generate();
    let mut checked = 0usize;
    for line in suite.lines() {
        let line = line.trim();
        let Some(args) = line
            .strip_prefix("assert_close!(")
            .and_then(|l| l.strip_suffix(");"))
        else {
            continue;
        };
        let parts: Vec<&str> = args.split(", ").collect();
        assert_eq!(parts.len(), 3, "malformed assertion: {line}");
        if !parts[0].ends_with(".mean()") && !parts[0].ends_with(".sum()") {
            continue; // the seed sanity case uses a fixed accuracy
        }
        let value: f32 = parts[1].parse().expect("value literal parses");
        let accuracy: f32 = parts[2].parse().expect("accuracy literal parses");
        let expected = cotejar::suite::verify::accuracy_for(value);
        assert_eq!(
            accuracy.to_bits(),
            expected.to_bits(),
            "tolerance {accuracy} is not 2% of {value}"
        );
        checked += 1;
    }
    assert!(checked > 500, "expected many statistics, found {checked}");
}

#[test]
fn fft_cases_split_complex_results_only() {
    let (suite, summary) = generate();
    // 12 transforms x 4 variants; the three inverse-real transforms (irfft,
    // irfft2, irfftn) produce real outputs verified directly.
    assert_eq!(summary.fft_cases, 48);
    let splits = suite.matches("let result_real = result.real();").count();
    assert_eq!(splits, 36);
}

#[test]
fn integer_ranged_arguments_stay_below_the_embedding_count() {
    // The embedding case synthesizes integer inputs in [0, 10) against a
    // ten-entry table; out-of-range lookups would abort generation.
    let (suite, _) = generate();
    let body = case_body(&suite, "test_embedding");
    assert!(body.contains("stream.randint(0, 10, &[2, 8, 8, 4])"));
    assert!(body.contains("Embedding::new(&mut stream, 10, 8)"));
    assert!(body.contains("assert_eq!(a.dtype(), Dtype::Int32);"));
}

#[test]
fn shared_base_names_get_distinct_identifiers() {
    let (suite, _) = generate();
    // `sum` exists as method and free function, bare/axis/axes: six cases.
    for name in ["test_sum", "test_sum1", "test_sum2", "test_sum3", "test_sum4", "test_sum5"] {
        assert!(
            suite.contains(&format!("fn {name}() {{")),
            "missing case `{name}`"
        );
    }
}

#[test]
fn normalization_layers_verify_subsets() {
    let (suite, _) = generate();
    let layer_norm = case_body(&suite, "test_layer_norm");
    assert!(layer_norm.contains(".index_last(0)"));
    let instance_norm = case_body(&suite, "test_instance_norm");
    assert!(instance_norm.contains(".index_prefix(&[0, 0])"));
    // RMS norm keeps the full output: no subset suffix on its forward line.
    let rms = case_body(&suite, "test_rms_norm");
    assert!(rms.contains("layer.forward(&mut stream, &a);"));
}

#[test]
fn optimizer_cases_pin_the_learning_rate_and_key() {
    let (suite, summary) = generate();
    // 9 optimizers + 4 hyperparameter variants + the Adafactor vector case.
    assert_eq!(summary.optimizer_cases, 14);
    let body = case_body(&suite, "test_sgd");
    assert!(body.contains("Sgd::new(0.1)"));
    assert!(body.contains("gradients.insert(\"a\", a_grad.clone());"));
    assert!(body.contains("result[\"a\"]"));
}

#[test]
fn pow_operands_are_positive_bounded() {
    let (suite, _) = generate();
    let body = case_body(&suite, "test_pow_op");
    assert_eq!(
        body.matches("stream.uniform(0.1, 2.0, &[4, 3])").count(),
        2,
        "both pow operands draw from the positive range"
    );
    assert!(body.contains("let result = a.pow(&b);"));
}

#[test]
fn quantization_case_verifies_all_three_outputs() {
    let (suite, _) = generate();
    let body = case_body(&suite, "test_quantize");
    assert!(body.contains("let (wq, scales, biases) = quantize(&w, 64, 8);"));
    assert!(body.contains("assert_eq!(wq.shape(), [32, 256]);"));
    assert!(body.contains("assert_eq!(scales.shape(), [32, 4]);"));
    assert!(body.contains("assert_eq!(biases.shape(), [32, 4]);"));
    assert!(body.contains("assert_eq!(wq.dtype(), Dtype::Int32);"));
}
