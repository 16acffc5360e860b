pub mod sp;

pub use sp::{checked_index, Itemset, ItemsetError};

#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
    use pyo3::exceptions::PyIndexError;
    use pyo3::prelude::*;
    use tracing::debug;

    use crate::sp::{checked_index, Itemset, ItemsetError};

    impl From<ItemsetError> for PyErr {
        fn from(err: ItemsetError) -> PyErr {
            PyIndexError::new_err(err.to_string())
        }
    }

    /// Itemset over integer items. Holds `Rc` storage, so instances stay on
    /// the thread that created them.
    #[pyclass(name = "Itemset", unsendable)]
    pub struct PyItemset {
        inner: Itemset<i64>,
    }

    #[pymethods]
    impl PyItemset {
        #[new]
        #[pyo3(signature = (timestamp=0))]
        fn new(timestamp: i64) -> Self {
            Self {
                inner: Itemset::with_timestamp(timestamp),
            }
        }

        fn add_item(&mut self, item: i64) {
            self.inner.add_item(item);
        }

        fn remove_item(&mut self, index: isize) -> PyResult<i64> {
            let index = checked_index(index, self.inner.size())?;
            Ok(*self.inner.remove_item(index)?)
        }

        fn get(&self, index: isize) -> PyResult<i64> {
            let index = checked_index(index, self.inner.size())?;
            Ok(*self.inner.get(index)?)
        }

        fn __len__(&self) -> usize {
            self.inner.size()
        }

        #[getter]
        fn timestamp(&self) -> i64 {
            self.inner.timestamp()
        }

        #[setter]
        fn set_timestamp(&mut self, timestamp: i64) {
            self.inner.set_timestamp(timestamp);
        }

        fn __str__(&self) -> String {
            self.inner.to_string()
        }

        fn __repr__(&self) -> String {
            let items: Vec<String> = self.inner.iter().map(|item| item.to_string()).collect();
            format!(
                "Itemset([{}], timestamp={})",
                items.join(", "),
                self.inner.timestamp()
            )
        }

        fn __eq__(&self, other: PyRef<'_, Self>) -> bool {
            self.inner == other.inner
        }

        fn __hash__(&self) -> u64 {
            self.inner.hash_code()
        }

        /// New itemset with its own item storage.
        fn clone_itemset(&self) -> Self {
            Self {
                inner: self.inner.duplicate(),
            }
        }

        /// New itemset sharing this one's item storage.
        fn share(&self) -> Self {
            Self {
                inner: Itemset::share_from(&self.inner),
            }
        }

        fn shares_storage_with(&self, other: PyRef<'_, Self>) -> bool {
            self.inner.shares_storage_with(&other.inner)
        }

        fn to_array<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<i64>> {
            let items: Vec<i64> = self.inner.iter().map(|item| *item).collect();
            items.into_pyarray(py)
        }
    }

    #[pymodule]
    fn seqitems<'py>(m: &Bound<'py, PyModule>) -> PyResult<()> {
        m.add_class::<PyItemset>()?;

        #[pyfn(m)]
        #[pyo3(name = "itemset_from_array", signature = (items, timestamp=0))]
        fn itemset_from_array_py(items: PyReadonlyArray1<'_, i64>, timestamp: i64) -> PyItemset {
            let mut inner: Itemset<i64> = items.as_array().iter().copied().collect();
            inner.set_timestamp(timestamp);
            debug!(size = inner.size(), timestamp, "built itemset from array");
            PyItemset { inner }
        }

        Ok(())
    }
}
