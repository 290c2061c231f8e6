use std::io::{self, Write};

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_tolerating_closed_reader(&mut stdout, text.as_bytes())
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_tolerating_closed_reader(&mut stdout, text.as_bytes())?;
    write_tolerating_closed_reader(&mut stdout, b"\n")
}

/// A reader that exits early (`fraudscope dashboard | head`) is not an error.
fn write_tolerating_closed_reader(writer: &mut dyn Write, bytes: &[u8]) -> io::Result<()> {
    let written = writer.write_all(bytes).and_then(|()| writer.flush());
    match written {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
