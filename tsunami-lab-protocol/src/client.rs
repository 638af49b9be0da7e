//! Blocking client connection to a tsunami-lab server.
//!
//! The communicator keeps a session log of everything sent and
//! received so a frontend can display the traffic without wiring up a
//! subscriber.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use chrono::Local;
use thiserror::Error;
use tracing::debug;

use crate::message::{keys, Message};

/// Startup size of the receive buffer in bytes.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8096;

const TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum CommunicatorError {
    #[error("Failed to reach the server: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode or decode a message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Server did not acknowledge the message")]
    NotAcknowledged,
}

enum LogKind {
    Sent,
    Received,
    Error,
    Info,
}

/// One TCP connection to a server, speaking line-delimited JSON.
pub struct Communicator {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    log: String,
}

impl Communicator {
    /// Connects and applies the read and write timeouts.
    pub fn connect(address: &str) -> Result<Self, CommunicatorError> {
        let stream = TcpStream::connect(address)?;
        stream.set_read_timeout(Some(TIMEOUT))?;
        stream.set_write_timeout(Some(TIMEOUT))?;
        let reader = BufReader::with_capacity(DEFAULT_READ_BUFFER_SIZE, stream.try_clone()?);
        let mut communicator = Self {
            reader,
            writer: stream,
            log: String::new(),
        };
        debug!(address = %address, "connected to server");
        communicator.record(LogKind::Info, &format!("socket connected to {address}"));
        Ok(communicator)
    }

    /// Sends one message and waits for the server's `OK` acknowledgement.
    pub fn send_message(&mut self, message: &Message) -> Result<(), CommunicatorError> {
        let line = serde_json::to_string(message)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.record(LogKind::Sent, &line);
        let ack = self.receive_raw()?;
        if ack == "OK" {
            Ok(())
        } else {
            self.record(LogKind::Error, "message was not acknowledged");
            Err(CommunicatorError::NotAcknowledged)
        }
    }

    /// Receives one message line from the server.
    pub fn receive_message(&mut self) -> Result<Message, CommunicatorError> {
        let line = self.receive_raw()?;
        Ok(serde_json::from_str(&line)?)
    }

    /// Receives a buffered transfer: concatenates chunk payloads until
    /// the server marks the end with [`keys::BUFFERED_SEND_FINISHED`].
    pub fn receive_buffered(&mut self) -> Result<String, CommunicatorError> {
        let mut data = String::new();
        loop {
            let message = self.receive_message()?;
            if message.key == keys::BUFFERED_SEND_FINISHED {
                break;
            }
            data.push_str(&message.args_text());
        }
        debug!(bytes = data.len(), "buffered transfer finished");
        Ok(data)
    }

    /// Resizes the receive buffer, used before large transfers.
    ///
    /// Bytes still sitting in the old buffer are dropped, so resize
    /// only between exchanges.
    pub fn set_read_buffer_size(&mut self, size: usize) -> Result<(), CommunicatorError> {
        let stream = self.writer.try_clone()?;
        self.reader = BufReader::with_capacity(size, stream);
        self.record(LogKind::Info, &format!("receive buffer resized to {size} bytes"));
        Ok(())
    }

    /// The session log, one `[HH:MM:SS] Label: text` line per event.
    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn receive_raw(&mut self) -> Result<String, CommunicatorError> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.record(LogKind::Error, "connection closed by server");
                Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into())
            }
            Ok(_) => {
                let line = line.trim_end().to_string();
                self.record(LogKind::Received, &line);
                Ok(line)
            }
            Err(error) => {
                self.record(LogKind::Error, "receiving failed or timed out");
                Err(error.into())
            }
        }
    }

    fn record(&mut self, kind: LogKind, text: &str) {
        let label = match kind {
            LogKind::Sent => "Sent    ",
            LogKind::Received => "Received",
            LogKind::Error => "Error   ",
            LogKind::Info => "Info    ",
        };
        let stamp = Local::now().format("%H:%M:%S");
        self.log.push_str(&format!("[{stamp}] {label}: {text}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::TcpListener;
    use std::thread;

    use crate::message::MessageType;

    fn write_line(stream: &mut TcpStream, message: &Message) {
        let line = serde_json::to_string(message).unwrap();
        stream.write_all(line.as_bytes()).unwrap();
        stream.write_all(b"\n").unwrap();
    }

    #[test]
    fn test_send_message_waits_for_ack() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            stream.write_all(b"OK\n").unwrap();
            line
        });

        let mut communicator = Communicator::connect(&address).unwrap();
        communicator
            .send_message(&Message::server_call(keys::CHECK))
            .unwrap();

        let line = server.join().unwrap();
        let sent: Message = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(sent.message_type, MessageType::ServerCall);
        assert_eq!(sent.key, keys::CHECK);
        assert!(communicator.log().contains("Sent"));
        assert!(communicator.log().contains(keys::CHECK));
    }

    #[test]
    fn test_unacknowledged_send_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            stream.write_all(b"REFUSED\n").unwrap();
        });

        let mut communicator = Communicator::connect(&address).unwrap();
        let error = communicator
            .send_message(&Message::server_call(keys::SHUTDOWN_SERVER))
            .unwrap_err();
        assert!(matches!(error, CommunicatorError::NotAcknowledged));
        assert!(communicator.log().contains("Error"));
        server.join().unwrap();
    }

    #[test]
    fn test_receive_buffered_concatenates_chunks() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            for chunk in ["1.0,2.", "5,3.0"] {
                write_line(
                    &mut stream,
                    &Message::server_response(keys::GET_HEIGHT_DATA).with_args(chunk),
                );
            }
            write_line(
                &mut stream,
                &Message::server_response(keys::BUFFERED_SEND_FINISHED),
            );
        });

        let mut communicator = Communicator::connect(&address).unwrap();
        communicator.set_read_buffer_size(20_000).unwrap();
        let data = communicator.receive_buffered().unwrap();
        assert_eq!(data, "1.0,2.5,3.0");
        server.join().unwrap();

        assert!(communicator.log().contains("buff_send_finished"));
        communicator.clear_log();
        assert!(communicator.log().is_empty());
    }
}
