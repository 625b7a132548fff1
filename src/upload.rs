//! Streaming a local file as the body of the upload PUT.

use super::error::{Error, Result};
use core::task::Poll;
use reqwest::Body;
use std::{
    cmp, io,
    path::Path,
    pin::Pin,
    sync::{Arc, Mutex},
    task::Context,
};
use tokio::{
    fs::File,
    io::{AsyncRead, ReadBuf},
};

const CHUNK_SIZE: u64 = 1024 * 32;

/// Called with `(bytes_sent, total_bytes)` after every chunk handed to the connection.
pub type ProgressListener = Arc<Mutex<dyn FnMut(u64, u64) + Send + Sync + 'static>>;

pub(crate) struct FileBody {
    pub len: u64,
    pub body: Body,
}

/// Opens `path` and wraps it into a request body of known length.
///
/// Nothing touches the network here, so a missing or unreadable file fails
/// before any request is sent.
pub(crate) async fn open(path: &Path, progress_listener: Option<ProgressListener>) -> Result<FileBody> {
    let io_err = |source| Error::Io {
        path: path.to_owned(),
        source,
    };

    let file = File::open(path).await.map_err(io_err)?;
    let len = file.metadata().await.map_err(io_err)?.len();

    let stream = ProgressStream {
        file,
        sent: 0,
        total: len,
        progress_listener,
    };

    Ok(FileBody {
        len,
        body: Body::wrap_stream(stream),
    })
}

pub(crate) struct ProgressStream {
    file: File,
    sent: u64,
    total: u64,
    progress_listener: Option<ProgressListener>,
}

impl futures::Stream for ProgressStream {
    type Item = io::Result<Vec<u8>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        let remain_len = this.total - this.sent;

        if remain_len == 0 {
            return Poll::Ready(None);
        }

        let mut chunk = vec![0u8; cmp::min(remain_len, CHUNK_SIZE) as usize];
        let mut read_buf = ReadBuf::new(&mut chunk);

        match Pin::new(&mut this.file).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => {
                this.sent = this.total;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(Ok(())) => {
                let read_len = read_buf.filled().len();
                if read_len == 0 {
                    // the file shrank after its size was taken
                    this.sent = this.total;
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "file ended before its reported size",
                    ))));
                }

                chunk.truncate(read_len);
                this.sent += read_len as u64;

                if let Some(pl) = this.progress_listener.as_ref() {
                    if let Ok(mut f) = pl.lock() {
                        f(this.sent, this.total);
                    }
                }

                Poll::Ready(Some(Ok(chunk)))
            }
        }
    }
}
