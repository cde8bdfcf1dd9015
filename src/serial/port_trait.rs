//! Trait abstraction for the GPS byte transport to enable testing

use std::io::{self, Read, Write};

/// Poll-based duplex byte stream to the GPS receiver
///
/// Reads never block: callers check [`GpsPort::available`] before each
/// [`GpsPort::read_byte`].
pub trait GpsPort {
    /// (Re)configure the line speed
    fn begin(&mut self, baud_rate: u32) -> io::Result<()>;

    /// Whether at least one byte can be read without blocking
    fn available(&mut self) -> io::Result<bool>;

    /// Read a single byte
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Write all data to the port
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;
}

/// Wrapper around a blocking `tokio_serial::SerialPort` that implements GpsPort
pub struct SerialGpsPort {
    port: Box<dyn tokio_serial::SerialPort>,
}

impl SerialGpsPort {
    pub fn new(port: Box<dyn tokio_serial::SerialPort>) -> Self {
        Self { port }
    }
}

impl GpsPort for SerialGpsPort {
    fn begin(&mut self, baud_rate: u32) -> io::Result<()> {
        self.port.set_baud_rate(baud_rate).map_err(io::Error::from)
    }

    fn available(&mut self) -> io::Result<bool> {
        let pending = self.port.bytes_to_read().map_err(io::Error::from)?;
        Ok(pending > 0)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(&mut self.port, data)?;
        self.port.flush()
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock GPS port for testing
    #[derive(Clone)]
    pub struct MockGpsPort {
        pub input: Arc<Mutex<VecDeque<u8>>>,
        pub written_data: Arc<Mutex<Vec<Vec<u8>>>>,
        pub baud_rates: Arc<Mutex<Vec<u32>>>,
        pub read_error: Arc<Mutex<Option<io::ErrorKind>>>,
        pub write_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockGpsPort {
        pub fn new() -> Self {
            Self {
                input: Arc::new(Mutex::new(VecDeque::new())),
                written_data: Arc::new(Mutex::new(Vec::new())),
                baud_rates: Arc::new(Mutex::new(Vec::new())),
                read_error: Arc::new(Mutex::new(None)),
                write_error: Arc::new(Mutex::new(None)),
            }
        }

        /// Queue bytes for the receiver to read
        pub fn feed(&self, data: &[u8]) {
            self.input.lock().unwrap().extend(data.iter().copied());
        }

        pub fn pending(&self) -> usize {
            self.input.lock().unwrap().len()
        }

        pub fn get_written_data(&self) -> Vec<Vec<u8>> {
            self.written_data.lock().unwrap().clone()
        }

        pub fn clear_written_data(&self) {
            self.written_data.lock().unwrap().clear();
        }

        pub fn get_baud_rates(&self) -> Vec<u32> {
            self.baud_rates.lock().unwrap().clone()
        }

        pub fn set_read_error(&self, error: io::ErrorKind) {
            *self.read_error.lock().unwrap() = Some(error);
        }

        pub fn set_write_error(&self, error: io::ErrorKind) {
            *self.write_error.lock().unwrap() = Some(error);
        }
    }

    impl GpsPort for MockGpsPort {
        fn begin(&mut self, baud_rate: u32) -> io::Result<()> {
            self.baud_rates.lock().unwrap().push(baud_rate);
            Ok(())
        }

        fn available(&mut self) -> io::Result<bool> {
            if let Some(error) = *self.read_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock read error"));
            }
            Ok(!self.input.lock().unwrap().is_empty())
        }

        fn read_byte(&mut self) -> io::Result<u8> {
            self.input
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::WouldBlock, "Mock input exhausted"))
        }

        fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
            if let Some(error) = *self.write_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock write error"));
            }
            self.written_data.lock().unwrap().push(data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_mock_port_reads_in_order() {
        let mut port = MockGpsPort::new();
        port.feed(b"$G");

        assert!(port.available().unwrap());
        assert_eq!(port.read_byte().unwrap(), b'$');
        assert_eq!(port.read_byte().unwrap(), b'G');
        assert!(!port.available().unwrap());
        assert!(port.read_byte().is_err());
    }

    #[test]
    fn test_mock_port_records_writes() {
        let mut port = MockGpsPort::new();
        port.write_all(b"one").unwrap();
        port.write_all(b"two").unwrap();
        assert_eq!(port.get_written_data(), vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn test_mock_port_write_error() {
        let mut port = MockGpsPort::new();
        port.set_write_error(io::ErrorKind::BrokenPipe);
        let err = port.write_all(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(port.get_written_data().is_empty());
    }
}
