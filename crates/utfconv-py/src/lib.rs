//! Python bindings: `utfconv.to_utf8` and `utfconv.to_utf16`.

use pyo3::{create_exception, exceptions::PyValueError, prelude::*, types::PyBytes};

create_exception!(
    utfconv,
    ConversionError,
    PyValueError,
    "A UTF-16/UTF-8 conversion failed."
);
create_exception!(
    utfconv,
    InvalidSequenceError,
    ConversionError,
    "The input is not valid in its claimed encoding."
);
create_exception!(
    utfconv,
    PlatformFailureError,
    ConversionError,
    "The conversion primitive failed for a reason other than input validity."
);

fn to_py_err(err: ::utfconv::ConversionError) -> PyErr {
    match err {
        ::utfconv::ConversionError::InvalidSequence(invalid) => {
            InvalidSequenceError::new_err((err.to_string(), invalid.offset()))
        }
        ::utfconv::ConversionError::PlatformFailure(code) => {
            PlatformFailureError::new_err((err.to_string(), code))
        }
    }
}

/// Convert a sequence of UTF-16 code units to UTF-8 `bytes`.
#[pyfunction]
pub fn to_utf8<'py>(py: Python<'py>, units: Vec<u16>) -> PyResult<Bound<'py, PyBytes>> {
    let bytes = ::utfconv::to_utf8(&units).map_err(to_py_err)?;
    Ok(PyBytes::new(py, &bytes))
}

/// Convert UTF-8 `bytes` to a list of UTF-16 code units.
#[pyfunction]
pub fn to_utf16(data: &[u8]) -> PyResult<Vec<u16>> {
    ::utfconv::to_utf16(data).map_err(to_py_err)
}

#[pymodule]
pub fn utfconv(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_function(wrap_pyfunction!(to_utf8, m)?)?;
    m.add_function(wrap_pyfunction!(to_utf16, m)?)?;
    m.add("ConversionError", py.get_type::<ConversionError>())?;
    m.add("InvalidSequenceError", py.get_type::<InvalidSequenceError>())?;
    m.add("PlatformFailureError", py.get_type::<PlatformFailureError>())?;
    Ok(())
}
