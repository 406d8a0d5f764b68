//! Scripted transport for unit tests.
//!
//! Records every wire command in order and answers from a small in-memory
//! model of the remote tree. Individual commands can be refused or made to
//! fault by their rendered text (for example `"CWD sub"`).

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::protocol::RemoteEntry;
use crate::transfer::{DataConnectionMode, FileType};
use crate::transport::FtpTransport;

pub(crate) struct MockTransport {
    calls: Arc<Mutex<Vec<String>>>,
    pub connected: bool,
    pub greeting_code: u16,
    pub accept_login: bool,
    pub pwd: Option<String>,
    /// Listing per absolute directory; a `None` value cannot be initiated.
    pub listings: HashMap<String, Option<Vec<Option<RemoteEntry>>>>,
    /// Commands answered with a negative reply.
    pub refuse: HashSet<String>,
    /// Commands refused the first time only, like CWD into a directory
    /// that a later MKD creates.
    pub refuse_once: HashSet<String>,
    /// Commands that raise a transport fault.
    pub fault: HashSet<String>,
    pub fault_on_disconnect: bool,
    pub refusal_reply: String,
    pub stored: Vec<(String, Vec<u8>)>,
    pub default_timeout: Option<Duration>,
    pub data_timeout: Option<Duration>,
    pub control_encoding: Option<String>,
    pub data_mode: Option<DataConnectionMode>,
    pub remote_verification: Option<bool>,
    pub list_hidden: bool,
    cwd: Vec<String>,
    last_code: u16,
    last_reply: String,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            calls: Arc::default(),
            connected: false,
            greeting_code: 220,
            accept_login: true,
            pwd: Some("/".to_string()),
            listings: HashMap::new(),
            refuse: HashSet::new(),
            refuse_once: HashSet::new(),
            fault: HashSet::new(),
            fault_on_disconnect: false,
            refusal_reply: "550 Requested action not taken.\r\n".to_string(),
            stored: Vec::new(),
            default_timeout: None,
            data_timeout: None,
            control_encoding: None,
            data_mode: None,
            remote_verification: None,
            list_hidden: false,
            cwd: Vec::new(),
            last_code: 0,
            last_reply: String::new(),
        }
    }

    /// A transport that is already connected, as after a successful session setup.
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::new()
        }
    }

    pub fn with_listing(mut self, dir: &str, entries: Vec<RemoteEntry>) -> Self {
        self.listings
            .insert(dir.to_string(), Some(entries.into_iter().map(Some).collect()));
        self
    }

    pub fn refusing(mut self, command: &str) -> Self {
        self.refuse.insert(command.to_string());
        self
    }

    pub fn refusing_once(mut self, command: &str) -> Self {
        self.refuse_once.insert(command.to_string());
        self
    }

    pub fn faulting(mut self, command: &str) -> Self {
        self.fault.insert(command.to_string());
        self
    }

    /// Handle on the command log that outlives the transport.
    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, command: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.to_string());
        }
    }

    pub fn cwd_path(&self) -> String {
        format!("/{}", self.cwd.join("/"))
    }

    /// Records the command and decides its outcome.
    fn answer(&mut self, command: String) -> io::Result<bool> {
        self.record(&command);
        if self.fault.contains(&command) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                format!("fault on {}", command),
            ));
        }
        if self.refuse.contains(&command) || self.refuse_once.remove(&command) {
            self.last_code = 550;
            self.last_reply = self.refusal_reply.clone();
            return Ok(false);
        }
        self.last_code = 250;
        self.last_reply = "250 OK.\r\n".to_string();
        Ok(true)
    }
}

impl FtpTransport for MockTransport {
    fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = Some(timeout);
    }

    fn set_data_timeout(&mut self, timeout: Duration) {
        self.data_timeout = Some(timeout);
    }

    fn set_control_encoding(&mut self, label: &str) -> io::Result<()> {
        self.control_encoding = Some(label.to_string());
        Ok(())
    }

    fn set_data_connection_mode(&mut self, mode: DataConnectionMode) {
        self.data_mode = Some(mode);
    }

    fn set_remote_verification(&mut self, enabled: bool) {
        self.remote_verification = Some(enabled);
    }

    fn set_list_hidden_files(&mut self, list_hidden: bool) {
        self.list_hidden = list_hidden;
    }

    async fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        self.answer(format!("CONNECT {}:{}", host, port))?;
        self.connected = true;
        self.last_code = self.greeting_code;
        self.last_reply = format!("{} Greetings.\r\n", self.greeting_code);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reply_code(&self) -> u16 {
        self.last_code
    }

    fn reply_string(&self) -> String {
        self.last_reply.clone()
    }

    async fn exec_pbsz(&mut self, size: u64) -> io::Result<()> {
        self.answer(format!("PBSZ {}", size)).map(|_| ())
    }

    async fn exec_prot(&mut self, level: &str) -> io::Result<()> {
        self.answer(format!("PROT {}", level)).map(|_| ())
    }

    async fn login(&mut self, username: &str, _password: &str) -> io::Result<bool> {
        let accepted = self.answer(format!("LOGIN {}", username))?;
        Ok(accepted && self.accept_login)
    }

    async fn print_working_directory(&mut self) -> io::Result<Option<String>> {
        if !self.answer("PWD".to_string())? {
            return Ok(None);
        }
        Ok(self.pwd.clone())
    }

    async fn change_working_directory(&mut self, directory: &str) -> io::Result<bool> {
        let accepted = self.answer(format!("CWD {}", directory))?;
        if accepted {
            if directory.starts_with('/') {
                self.cwd.clear();
            }
            self.cwd
                .extend(directory.split('/').filter(|p| !p.is_empty()).map(String::from));
        }
        Ok(accepted)
    }

    async fn change_to_parent_directory(&mut self) -> io::Result<bool> {
        let accepted = self.answer("CDUP".to_string())?;
        if accepted {
            self.cwd.pop();
        }
        Ok(accepted)
    }

    async fn make_directory(&mut self, directory: &str) -> io::Result<bool> {
        self.answer(format!("MKD {}", directory))
    }

    async fn remove_directory(&mut self, directory: &str) -> io::Result<bool> {
        self.answer(format!("RMD {}", directory))
    }

    async fn delete_file(&mut self, file: &str) -> io::Result<bool> {
        self.answer(format!("DELE {}", file))
    }

    async fn set_file_type(&mut self, file_type: FileType) -> io::Result<bool> {
        let command = match file_type {
            FileType::Ascii => "TYPE A",
            FileType::Binary => "TYPE I",
        };
        self.answer(command.to_string())
    }

    async fn list_entries(&mut self) -> io::Result<Option<Vec<Option<RemoteEntry>>>> {
        if !self.answer("LIST".to_string())? {
            return Ok(None);
        }
        let path = self.cwd_path();
        Ok(self.listings.get(&path).cloned().unwrap_or(Some(Vec::new())))
    }

    async fn store_file<R>(&mut self, remote_name: &str, content: &mut R) -> io::Result<bool>
    where
        R: AsyncRead + Unpin,
    {
        if !self.answer(format!("STOR {}", remote_name))? {
            return Ok(false);
        }
        let mut data = Vec::new();
        content.read_to_end(&mut data).await?;
        self.stored.push((remote_name.to_string(), data));
        Ok(true)
    }

    async fn disconnect(&mut self) -> io::Result<()> {
        self.record("DISCONNECT");
        if self.fault_on_disconnect {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "close failed"));
        }
        self.connected = false;
        Ok(())
    }
}
