//! Output sinks for rendered contracts.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use tsol_codegen_sol::{ContractSink, RenderedContract};

/// Writes each contract followed by a newline, flushing after each one.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ContractSink for WriterSink<W> {
    fn emit(&mut self, contract: &RenderedContract) -> io::Result<()> {
        writeln!(self.writer, "{contract}")?;
        self.writer.flush()
    }
}

/// Writes each contract to `<dir>/<Name>.sol`.
pub struct DirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in emission order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ContractSink for DirSink {
    fn emit(&mut self, contract: &RenderedContract) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.sol", contract.name));
        debug!("writing {}", path.display());
        fs::write(&path, format!("{contract}\n"))?;
        self.written.push(path);
        Ok(())
    }
}

#[derive(Serialize)]
struct ContractRecord<'a> {
    contract: &'a str,
    source: String,
}

/// Writes one `{"contract": ..., "source": ...}` JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ContractSink for JsonLinesSink<W> {
    fn emit(&mut self, contract: &RenderedContract) -> io::Result<()> {
        let record = ContractRecord {
            contract: &contract.name,
            source: contract.text(),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Keeps every contract in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    pub contracts: Vec<RenderedContract>,
}

impl ContractSink for VecSink {
    fn emit(&mut self, contract: &RenderedContract) -> io::Result<()> {
        self.contracts.push(contract.clone());
        Ok(())
    }
}
