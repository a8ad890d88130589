//! 持ち越しバッファ
//!
//! 前回の `read` でトークンにならなかったバイト列を保持する。

/// 持ち越しバッファ
///
/// 所有バッファと読み取りカーソルの組。不変条件は `offset <= buf.len()`。
///
/// `view()` が返すスライスは次の `merge()` / `add_offset()` までしか有効でない。
/// 借用チェッカーがこれを強制するため、パース結果は所有データへコピーしてから
/// バッファを変更する。
///
/// ```rust
/// use http11_deserializer::RemainderBuffer;
///
/// let mut buffer = RemainderBuffer::new();
/// assert_eq!(buffer.merge(b"GET / HT"), 0);
/// buffer.add_offset(6);
/// assert_eq!(buffer.view(), b"HT");
/// assert_eq!(buffer.merge(b"TP/1.1\r\n"), 6);
/// assert_eq!(buffer.view(), b"HTTP/1.1\r\n");
/// ```
#[derive(Debug, Default)]
pub struct RemainderBuffer {
    buf: Vec<u8>,
    offset: usize,
}

impl RemainderBuffer {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 未消費のバイト列
    pub fn view(&self) -> &[u8] {
        &self.buf[self.offset..]
    }

    /// 未消費のバイト数
    pub fn len(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// 未消費のバイトがないか
    pub fn is_empty(&self) -> bool {
        self.offset == self.buf.len()
    }

    /// 新しいチャンクを末尾に追加
    ///
    /// 消費済みの先頭部分を捨ててから追加する。すべて消費済みなら単純な置き換えになる。
    /// 戻り値は追加前のカーソル位置。
    pub fn merge(&mut self, chunk: &[u8]) -> usize {
        let offset = std::mem::take(&mut self.offset);
        if offset == self.buf.len() {
            self.buf.clear();
        } else {
            self.buf.drain(..offset);
        }
        self.buf.extend_from_slice(chunk);
        offset
    }

    /// カーソルを `n` バイト進める
    ///
    /// # Panics
    ///
    /// 未消費のバイト数を超えて進めた場合。遷移が受け取った以上のバイトを
    /// 消費したと報告したことを意味し、入力データではなくプログラムの誤り。
    pub fn add_offset(&mut self, n: usize) {
        assert!(
            n <= self.len(),
            "remainder offset overflow: {} + {} > {}",
            self.offset,
            n,
            self.buf.len()
        );
        self.offset += n;
        if self.offset == self.buf.len() {
            // 容量は残して空に戻す
            self.buf.clear();
            self.offset = 0;
        }
    }

    /// 保持しているバイト列をすべて破棄
    pub fn clear(&mut self) {
        self.buf.clear();
        self.offset = 0;
    }
}
