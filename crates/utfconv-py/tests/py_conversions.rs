use pyo3::{
    Python,
    types::{PyAnyMethods, PyBytesMethods, PyModule},
};
use utfconv_py::{ConversionError, InvalidSequenceError, to_utf16, to_utf8};

#[test]
fn to_utf8_returns_bytes() {
    Python::with_gil(|py| {
        let bytes = to_utf8(py, vec![0x5B66]).unwrap();
        assert_eq!(bytes.as_bytes(), &[0xE5, 0xAD, 0xA6]);
    });
}

#[test]
fn to_utf16_returns_code_units() {
    assert_eq!(to_utf16("a\u{1F600}".as_bytes()).unwrap(), vec![0x61, 0xD83D, 0xDE00]);
    assert_eq!(to_utf16(&[]).unwrap(), Vec::<u16>::new());
}

#[test]
fn invalid_input_raises_invalid_sequence_error() {
    Python::with_gil(|py| {
        let err = to_utf8(py, vec![0x41, 0xD800]).unwrap_err();
        assert!(err.is_instance_of::<InvalidSequenceError>(py));
        assert!(err.is_instance_of::<ConversionError>(py));
        assert!(err.is_instance_of::<pyo3::exceptions::PyValueError>(py));

        let err = to_utf16(&[0xC0, 0x80]).unwrap_err();
        let args = err.value(py).getattr("args").unwrap();
        let (message, offset): (String, usize) = args.extract().unwrap();
        assert_eq!(
            message,
            "invalid UTF-8 sequence at byte 0: overlong encoding"
        );
        assert_eq!(offset, 0);
    });
}

#[test]
fn module_exposes_functions_and_exceptions() {
    Python::with_gil(|py| {
        let m = PyModule::new(py, "utfconv").unwrap();
        utfconv_py::utfconv(&m).unwrap();
        let converted = m
            .getattr("to_utf16")
            .unwrap()
            .call1((pyo3::types::PyBytes::new(py, b"ok"),))
            .unwrap();
        assert_eq!(converted.extract::<Vec<u16>>().unwrap(), vec![0x6F, 0x6B]);
        assert!(m.getattr("InvalidSequenceError").is_ok());
    });
}
