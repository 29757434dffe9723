//! Note files: a document on disk is its notes, encoded back to back.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;

use log::error;
use log::warn;

use crate::channel::Channel;
use crate::error::DecodeError;
use crate::error::Error;
use crate::note::Note;
use crate::note::NoteStream;
use crate::score::Score;
use crate::session::Session;

/// Decode every note in `bytes`.
pub fn read_notes(bytes: &[u8]) -> Result<Vec<Note>, DecodeError> {
    return NoteStream::new(bytes).collect();
}

/// The score stored at `path`.
pub fn read_score_file(session: &mut Session, path: impl AsRef<Path>) -> Result<Score, Error> {
    let bytes = fs::read(path)?;
    return Ok(session.load(&bytes)?);
}

/// Appends notes to a writer, flushing after each one so a crash loses at
/// most the note being written.
///
/// Used as a channel receiver, the writer cannot return errors to the
/// broadcaster. It keeps the first one instead and writes nothing after it,
/// so the file never holds a note whose predecessor is missing.
pub struct NoteWriter<W: Write> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: Write> NoteWriter<W> {
    pub fn new(inner: W) -> NoteWriter<W> {
        return NoteWriter { inner, error: None };
    }

    pub fn write_note(&mut self, note: &Note) -> io::Result<()> {
        self.inner.write_all(&note.to_bytes())?;
        return self.inner.flush();
    }

    /// Like `write_note`, for use as a channel receiver.
    pub fn receive(&mut self, note: &Note) {
        if self.error.is_some() {
            warn!("dropping {} after an earlier write failure", note.name());
            return;
        }
        if let Err(err) = self.write_note(note) {
            error!("failed to write {}: {}", note.name(), err);
            self.error = Some(err);
        }
    }

    /// The first error `receive` ran into, if any. Taking it resumes writing.
    pub fn take_error(&mut self) -> Option<io::Error> {
        return self.error.take();
    }

    /// The inner writer, or the first error `receive` ran into.
    pub fn finish(self) -> io::Result<W> {
        return match self.error {
            Some(err) => Err(err),
            None => Ok(self.inner),
        };
    }
}

/// Start a new document: every document's history begins with an empty list.
pub fn initialize_history(channel: &mut Channel<'_, Note>) {
    channel.broadcast(&Note::BecomeList);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_output_reads_back() {
        let notes = vec![
            Note::BecomeList,
            Note::insert(0, Note::become_atom("a")),
            Note::extend(0, Note::set_atom("b")),
        ];
        let mut writer = NoteWriter::new(Vec::new());
        for note in &notes {
            writer.write_note(note).unwrap();
        }
        let bytes = writer.finish().unwrap();
        assert_eq!(read_notes(&bytes).unwrap(), notes);

        let mut session = Session::new();
        let score = session.load(&bytes).unwrap();
        assert_eq!(session.play(&score).unwrap().unwrap().to_string(), "(b)");
    }

    #[test]
    fn truncated_files_fail() {
        let bytes = Note::insert(0, Note::become_atom("abc")).to_bytes();
        assert!(read_notes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn history_starts_with_a_list() {
        let mut writer = NoteWriter::new(Vec::new());
        {
            let mut channel = Channel::new();
            channel.connect(|note: &Note| writer.receive(note));
            initialize_history(&mut channel);
        }
        assert_eq!(read_notes(&writer.finish().unwrap()).unwrap(), vec![Note::BecomeList]);
    }

    struct BrokenPipe {
        attempts: usize,
    }

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }

        fn flush(&mut self) -> io::Result<()> {
            return Ok(());
        }
    }

    #[test]
    fn receive_keeps_the_first_error() {
        let mut writer = NoteWriter::new(BrokenPipe { attempts: 0 });
        {
            let mut channel = Channel::new();
            channel.connect(|note: &Note| writer.receive(note));
            initialize_history(&mut channel);
            channel.broadcast(&Note::insert(0, Note::BecomeList));
        }
        assert_eq!(writer.inner.attempts, 1);
        let err = writer.take_error().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(writer.take_error().is_none());

        writer.receive(&Note::Delete(0));
        assert_eq!(writer.inner.attempts, 2);
        let err = writer.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn missing_files_are_io_errors() {
        let mut session = Session::new();
        let result = read_score_file(&mut session, "/nonexistent/document.nerf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
