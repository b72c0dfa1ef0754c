//! # Key Layout

/// Builds the keys of one chain's namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyLayout {
    namespace: String,
}

impl KeyLayout {
    /// Layout for chain `symbol` (namespace is the lowercase symbol).
    pub fn new(symbol: &str) -> Self {
        Self {
            namespace: symbol.to_lowercase(),
        }
    }

    /// Namespace prefix.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Cursor key.
    pub fn cursor(&self) -> Vec<u8> {
        format!("{}:cursor", self.namespace).into_bytes()
    }

    /// Prefix of every block record.
    pub fn block_prefix(&self) -> Vec<u8> {
        format!("{}:block:", self.namespace).into_bytes()
    }

    /// Block record key.
    pub fn block(&self, height: u64) -> Vec<u8> {
        let mut key = self.block_prefix();
        key.extend_from_slice(&height.to_be_bytes());
        key
    }

    /// Prefix of every unscan record.
    pub fn unscan_prefix(&self) -> Vec<u8> {
        format!("{}:unscan:", self.namespace).into_bytes()
    }

    /// Prefix of the unscan records at `height`.
    pub fn unscan_height_prefix(&self, height: u64) -> Vec<u8> {
        let mut key = self.unscan_prefix();
        key.extend_from_slice(&height.to_be_bytes());
        key.push(b':');
        key
    }

    /// Unscan record key for `(height, tx_id)`.
    pub fn unscan(&self, height: u64, tx_id: &str) -> Vec<u8> {
        let mut key = self.unscan_height_prefix(height);
        key.extend_from_slice(tx_id.as_bytes());
        key
    }
}
