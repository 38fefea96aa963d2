//! Byte-counting connection wrapper.
//!
//! `MeteredConnection` forwards every read, write, flush and shutdown to the
//! wrapped connection unchanged and only observes how many bytes the inner
//! connection reported as transferred. Errors pass through untouched and
//! leave the counters as they were.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

#[derive(Debug)]
pub struct MeteredConnection<C> {
    inner: C,
    tx_bytes: u64,
    rx_bytes: u64,
}

impl<C> MeteredConnection<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            tx_bytes: 0,
            rx_bytes: 0,
        }
    }

    /// Bytes the inner connection accepted for sending.
    pub fn tx_bytes(&self) -> u64 {
        self.tx_bytes
    }

    /// Bytes the inner connection delivered to readers.
    pub fn rx_bytes(&self) -> u64 {
        self.rx_bytes
    }
}

impl<C: AsyncRead + Unpin> AsyncRead for MeteredConnection<C> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let result = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = result {
            this.rx_bytes += (buf.filled().len() - before) as u64;
        }
        result
    }
}

impl<C: AsyncWrite + Unpin> AsyncWrite for MeteredConnection<C> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let result = Pin::new(&mut this.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(written)) = result {
            this.tx_bytes += written as u64;
        }
        result
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
