//! Async Decompression Operations (feature-gated behind `async`)

use crate::Compression;
use async_compression::futures::bufread::BzDecoder;
use futures::io::AsyncRead;
use futures::io::BufReader as AsyncBufReader;

impl Compression {
    /// Wrap an async reader with the appropriate decompression layer.
    /// Automatically wraps with a buffered reader internally.
    ///
    /// A bzip2 payload may be several streams written back to back (as
    /// parallel compressors produce them), and every one of them is decoded.
    /// Decoder errors surface as [`std::io::Error`]s from the returned reader:
    /// bytes after a stream that do not start another valid stream are
    /// [`InvalidData`](std::io::ErrorKind::InvalidData), and a stream that ends
    /// before its end-of-stream marker is
    /// [`UnexpectedEof`](std::io::ErrorKind::UnexpectedEof).
    pub fn async_wrap_reader<'a, R: AsyncRead + Unpin + Send + 'a>(
        &self,
        reader: R,
    ) -> Box<dyn AsyncRead + Unpin + Send + 'a> {
        // `async-compression` requires AsyncBufRead. Wrap the incoming
        // AsyncRead in a buffered version, so the callee doesn't need to.
        let reader = AsyncBufReader::new(reader);
        match self {
            Compression::None => Box::new(reader),
            Compression::Bzip2 => {
                let mut decoder = BzDecoder::new(reader);
                decoder.multiple_members(true);
                Box::new(decoder)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;
    use futures::io::{AsyncReadExt, Cursor};
    use rstest::rstest;

    async fn decode(format: Compression, input: Vec<u8>) -> std::io::Result<Vec<u8>> {
        let mut reader = format.async_wrap_reader(Cursor::new(input));
        let mut decompressed = Vec::new();
        reader.read_to_end(&mut decompressed).await?;
        Ok(decompressed)
    }

    #[tokio::test]
    #[rstest]
    #[case(Compression::None)]
    #[case(Compression::Bzip2)]
    async fn test_async_wrap_reader(#[case] format: Compression) {
        let original = b"SQLite format 3\0 and then some pages";
        let compressed = format.compress(original).unwrap();
        assert_eq!(decode(format, compressed).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_async_wrap_reader_concatenated_streams() {
        let first = vec![b'a'; 1000];
        let second = vec![b'b'; 1000];
        let mut payload = Compression::Bzip2.compress(&first).unwrap();
        payload.extend(Compression::Bzip2.compress(&second).unwrap());
        let decompressed = decode(Compression::Bzip2, payload).await.unwrap();
        assert_eq!(decompressed.len(), 2000);
        assert_eq!(&decompressed[..1000], first.as_slice());
        assert_eq!(&decompressed[1000..], second.as_slice());
    }

    #[tokio::test]
    async fn test_async_wrap_reader_trailing_junk() {
        let mut payload = Compression::Bzip2.compress(&[b'x'; 1000]).unwrap();
        payload.extend_from_slice(b"this is not another bzip2 stream");
        assert!(decode(Compression::Bzip2, payload).await.is_err());
    }

    #[tokio::test]
    async fn test_async_wrap_reader_truncated() {
        let original = vec![b'x'; 8192];
        let compressed = Compression::Bzip2.compress(&original).unwrap();
        let truncated = compressed[..compressed.len() - 8].to_vec();
        assert!(decode(Compression::Bzip2, truncated).await.is_err());
    }

    #[tokio::test]
    async fn test_async_wrap_reader_corrupt() {
        assert!(decode(Compression::Bzip2, b"BZh9 but not really".to_vec()).await.is_err());
    }
}
