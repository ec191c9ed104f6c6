//! builtin.rs
//! Name-agnostic combiners: they read arguments in edge order, so they work
//! with positional bindings whatever the predecessors are called. Arguments
//! bound as `lhs` and `rhs` go first and second.

use super::args::Arguments;
use super::context::CombineContext;
use crate::compute::{kernel, Value};
use crate::error::{GraphError, Result};

/// Numeric operands with `lhs` first, `rhs` second, then the rest in edge order.
fn operands(args: &Arguments) -> Result<Vec<&Value>> {
    let mut keyed: Vec<(&str, &Value)> = args.keys().zip(args.numeric_values()?).collect();
    keyed.sort_by_key(|(key, _)| match *key {
        "lhs" => 0,
        "rhs" => 1,
        _ => 2,
    });
    Ok(keyed.into_iter().map(|(_, v)| v).collect())
}

fn at_least_one(args: &Arguments) -> Result<Vec<&Value>> {
    let values = operands(args)?;
    if values.is_empty() {
        return Err(GraphError::binding(args.operation(), "expected at least one argument"));
    }
    Ok(values)
}

fn pair(args: &Arguments) -> Result<(&Value, &Value)> {
    args.expect_arity(2)?;
    let values = operands(args)?;
    Ok((values[0], values[1]))
}

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

pub fn add(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    kernel::fold(&at_least_one(args)?, |a, b| a + b)
}

/// First argument minus all others.
pub fn subtract(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    kernel::fold(&at_least_one(args)?, |a, b| a - b)
}

pub fn multiply(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    kernel::fold(&at_least_one(args)?, |a, b| a * b)
}

/// First argument divided by all others. Division by zero yields infinities, not errors.
pub fn divide(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    kernel::fold(&at_least_one(args)?, |a, b| a / b)
}

pub fn minimum(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    kernel::fold(&at_least_one(args)?, f64::min)
}

pub fn maximum(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    kernel::fold(&at_least_one(args)?, f64::max)
}

/// Scenario-wise mean across arguments.
pub fn mean(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    let values = at_least_one(args)?;
    let n = values.len() as f64;
    let total = kernel::fold(&values, |a, b| a + b)?;
    Ok(kernel::map(&total, |x| x / n))
}

/// 1.0 where the first argument exceeds the second, else 0.0.
pub fn greater_than(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    let (lhs, rhs) = pair(args)?;
    kernel::zip_with(lhs, rhs, |a, b| indicator(a > b))
}

pub fn less_than(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    let (lhs, rhs) = pair(args)?;
    kernel::zip_with(lhs, rhs, |a, b| indicator(a < b))
}

pub fn negate(_: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
    args.expect_arity(1)?;
    Ok(kernel::map(args.numeric_values()?[0], |x| -x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::SamplerRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    type Builtin = fn(&mut CombineContext<'_>, &Arguments) -> Result<Value>;

    fn call(f: Builtin, values: &[(&str, Value)]) -> Result<Value> {
        let mut rng = StdRng::seed_from_u64(0);
        let samplers = SamplerRegistry::new();
        let mut ctx = CombineContext::new("test", 3, &mut rng, &samplers);
        let mut args = Arguments::new("test");
        for (k, v) in values {
            args.insert(*k, v.clone())?;
        }
        f(&mut ctx, &args)
    }

    fn s(v: f64) -> Value { Value::Scalar(v) }

    #[rstest]
    #[case(add as Builtin, 10.0)]
    #[case(subtract as Builtin, 6.0)]
    #[case(multiply as Builtin, 16.0)]
    #[case(divide as Builtin, 4.0)]
    #[case(minimum as Builtin, 2.0)]
    #[case(maximum as Builtin, 8.0)]
    #[case(mean as Builtin, 5.0)]
    #[case(greater_than as Builtin, 1.0)]
    #[case(less_than as Builtin, 0.0)]
    fn test_scalar_pairs(#[case] f: Builtin, #[case] expected: f64) {
        let out = call(f, &[("x", s(8.0)), ("y", s(2.0))]).unwrap();
        assert_eq!(out, s(expected));
    }

    #[test]
    fn test_order_follows_binding_order() {
        let out = call(subtract, &[("b", s(1.0)), ("a", s(5.0))]).unwrap();
        assert_eq!(out, s(-4.0));
    }

    #[test]
    fn test_lhs_rhs_bindings_override_edge_order() {
        let out = call(subtract, &[("rhs", s(30.0)), ("lhs", s(100.0))]).unwrap();
        assert_eq!(out, s(70.0));
        let out = call(divide, &[("rhs", s(4.0)), ("lhs", s(8.0))]).unwrap();
        assert_eq!(out, s(2.0));
        let out = call(greater_than, &[("rhs", s(1.0)), ("lhs", s(5.0))]).unwrap();
        assert_eq!(out, s(1.0));
        let out = call(less_than, &[("rhs", s(1.0)), ("lhs", s(5.0))]).unwrap();
        assert_eq!(out, s(0.0));
    }

    #[test]
    fn test_series_comparison_yields_indicator() {
        let bids = Value::series(vec![11_000.0, 13_000.0, 12_500.0]);
        let out = call(greater_than, &[("bids", bids), ("mine", s(12_000.0))]).unwrap();
        assert_eq!(out, Value::series(vec![0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_arity_errors() {
        assert!(matches!(call(add, &[]), Err(GraphError::ParameterBinding { .. })));
        assert!(matches!(call(negate, &[("a", s(1.0)), ("b", s(2.0))]), Err(GraphError::ParameterBinding { .. })));
        assert!(matches!(call(greater_than, &[("a", s(1.0))]), Err(GraphError::ParameterBinding { .. })));
    }

    #[test]
    fn test_record_operand_rejected() {
        let rec = Value::record([("left", 1.0)]);
        assert!(matches!(call(add, &[("r", rec)]), Err(GraphError::NonNumeric { .. })));
    }
}
