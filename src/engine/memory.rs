/// A chunk of inferior memory reported by the engine
#[derive(Debug, Clone, Default)]
pub struct MemoryBlock {
    /// Address of the first byte
    pub address: u64,
    /// The bytes themselves
    pub bytes: Vec<u8>,
}

impl MemoryBlock {
    pub fn new(address: u64, bytes: Vec<u8>) -> Self {
        Self { address, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render the block as `address | hex | ascii` dump rows
    pub fn hexdump(&self, bytes_per_row: usize) -> Vec<String> {
        let bytes_per_row = bytes_per_row.max(1);
        let mut rows = Vec::new();

        for (row_idx, chunk) in self.bytes.chunks(bytes_per_row).enumerate() {
            let row_address = self.address + (row_idx * bytes_per_row) as u64;

            let mut hex_text = String::with_capacity(bytes_per_row * 3);
            let mut ascii_text = String::with_capacity(bytes_per_row);

            for byte in chunk {
                hex_text.push_str(&format!("{:02x} ", byte));

                // Only printable characters in the ASCII column
                if (32..=126).contains(byte) {
                    ascii_text.push(*byte as char);
                } else {
                    ascii_text.push('.');
                }
            }

            for _ in chunk.len()..bytes_per_row {
                hex_text.push_str("   ");
                ascii_text.push(' ');
            }

            rows.push(format!(
                "{:016x} | {}| {}",
                row_address, hex_text, ascii_text
            ));
        }

        rows
    }
}
