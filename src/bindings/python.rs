use crate::combine::{Arguments, CombineContext};
use crate::compute::Value;
use crate::config::ScenarioConfig;
use crate::error::{GraphError, Result};
use crate::scenario::{Incoming, ScenarioGraph};
use crate::sampling::Parameters;
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::collections::HashMap;

fn to_py_err(e: GraphError) -> PyErr {
    match e {
        GraphError::UnknownNode { .. } => PyKeyError::new_err(e.to_string()),
        GraphError::DuplicateNode { .. }
        | GraphError::InvalidConfig(_)
        | GraphError::InvalidParameters { .. }
        | GraphError::ParameterBinding { .. } => PyValueError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

fn incoming(names: Vec<String>, params: Option<Vec<String>>) -> PyResult<Incoming> {
    match params {
        None => Ok(Incoming::Positional(names)),
        Some(params) if params.len() == names.len() => Ok(Incoming::named(names.into_iter().zip(params))),
        Some(_) => Err(PyValueError::new_err("incoming and params must have the same length")),
    }
}

/// Calls `callable` with the bound arguments as keyword arguments. Scalars
/// arrive as floats, series as lists and records as dicts. The result may be
/// a float or a sequence of floats.
fn call_operation(py: Python<'_>, callable: &Py<PyAny>, args: &Arguments) -> PyResult<Value> {
    let kwargs = PyDict::new(py);
    for (key, value) in args.iter() {
        match value {
            Value::Scalar(x) => kwargs.set_item(key, *x)?,
            Value::Series(samples) => kwargs.set_item(key, samples.as_slice())?,
            Value::Record(fields) => kwargs.set_item(key, (**fields).clone())?,
        }
    }
    let out = callable.bind(py).call((), Some(&kwargs))?;
    if let Ok(x) = out.extract::<f64>() {
        return Ok(Value::Scalar(x));
    }
    Ok(Value::series(out.extract::<Vec<f64>>()?))
}

fn python_combiner(
    operation: String,
    callable: Py<PyAny>,
) -> impl Fn(&mut CombineContext<'_>, &Arguments) -> Result<Value> + Send + Sync + 'static {
    move |_, args| {
        Python::attach(|py| call_operation(py, &callable, args))
            .map_err(|e| GraphError::OperationFailed { operation: operation.clone(), message: e.to_string() })
    }
}

#[pyclass(name = "ScenarioGraph")]
#[derive(Debug, Clone)]
pub struct PyScenarioGraph {
    inner: ScenarioGraph,
}

#[pymethods]
impl PyScenarioGraph {
    #[new]
    #[pyo3(signature = (seed = 42, nsim = 1000))]
    pub fn new(seed: u64, nsim: usize) -> PyResult<Self> {
        let inner = ScenarioGraph::new(ScenarioConfig::new(seed, nsim)).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    pub fn seed(&self) -> u64 { self.inner.seed() }

    #[setter]
    pub fn set_seed(&mut self, seed: u64) { self.inner.set_seed(seed) }

    #[getter]
    pub fn nsim(&self) -> usize { self.inner.nsim() }

    #[pyo3(signature = (name, value, description = ""))]
    pub fn add_input(&mut self, name: &str, value: Vec<f64>, description: &str) -> PyResult<usize> {
        let id = if value.len() == 1 {
            self.inner.add_input(name, value[0], description)
        } else {
            self.inner.add_input(name, value, description)
        };
        id.map(|id| id.index()).map_err(to_py_err)
    }

    #[pyo3(signature = (name, distribution, parameters, description = ""))]
    pub fn add_random(
        &mut self,
        name: &str,
        distribution: &str,
        parameters: HashMap<String, f64>,
        description: &str,
    ) -> PyResult<usize> {
        let params: Parameters = parameters.into_iter().collect();
        self.inner.add_random(name, distribution, params, description).map(|id| id.index()).map_err(to_py_err)
    }

    /// Makes a Python callable available as operation `name`. With `params`,
    /// nodes using it must bind exactly those argument names.
    #[pyo3(signature = (name, callable, params = None))]
    pub fn register_operation(
        &mut self,
        py: Python<'_>,
        name: &str,
        callable: Py<PyAny>,
        params: Option<Vec<String>>,
    ) -> PyResult<()> {
        if !callable.bind(py).is_callable() {
            return Err(PyTypeError::new_err(format!("operation '{}' must be callable", name)));
        }
        let combiner = python_combiner(name.to_string(), callable);
        let combiners = self.inner.combiners_mut();
        match params {
            Some(params) => {
                let params: Vec<&str> = params.iter().map(String::as_str).collect();
                combiners.register_with_params(name, &params, combiner);
            }
            None => combiners.register(name, combiner),
        }
        Ok(())
    }

    #[pyo3(signature = (name, operation, incoming_nodes, params = None, description = ""))]
    pub fn add_operation(
        &mut self,
        name: &str,
        operation: &str,
        incoming_nodes: Vec<String>,
        params: Option<Vec<String>>,
        description: &str,
    ) -> PyResult<usize> {
        let inc = incoming(incoming_nodes, params)?;
        self.inner.add_operation(name, operation, inc, description).map(|id| id.index()).map_err(to_py_err)
    }

    #[pyo3(signature = (name, operation, incoming_nodes, params = None, description = ""))]
    pub fn add_goal(
        &mut self,
        name: &str,
        operation: &str,
        incoming_nodes: Vec<String>,
        params: Option<Vec<String>>,
        description: &str,
    ) -> PyResult<usize> {
        let inc = incoming(incoming_nodes, params)?;
        self.inner.add_goal(name, operation, inc, description).map(|id| id.index()).map_err(to_py_err)
    }

    /// Evaluates `name` in a new pass. Scalars come back as one-element lists.
    pub fn eval(&mut self, name: &str) -> PyResult<Vec<f64>> {
        let value = self.inner.eval(name).map_err(to_py_err)?;
        Ok(value.to_vec())
    }

    pub fn generate_stats(&mut self, name: &str) -> PyResult<HashMap<String, f64>> {
        let stats = self.inner.generate_stats(name).map_err(to_py_err)?;
        Ok(stats.entries().iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    pub fn validate_inputs(&self) -> bool { self.inner.validate_inputs() }

    pub fn validate_goals(&self) -> bool { self.inner.validate_goals() }

    pub fn goal_nodes(&self) -> Vec<String> {
        self.inner.goal_nodes().into_iter().map(str::to_string).collect()
    }

    pub fn trace(&self, name: &str) -> PyResult<String> {
        self.inner.trace(name).map_err(to_py_err)
    }
}

/// The compiled `_core` module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyScenarioGraph>()?;
    Ok(())
}
