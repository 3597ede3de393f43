/// An encapsulation of a byte stream reader.
///
/// The reader borrows the data it walks over, hence the
/// lifetime parameter. The position always points at the
/// next byte to be returned.
///
/// The rpk wire format is big endian only and never reads
/// anything wider than four bytes, so that is the whole
/// integer surface offered here.
pub struct ZByteReader<'a>
{
    /// Data stream
    stream:   &'a [u8],
    position: usize
}

impl<'a> ZByteReader<'a>
{
    /// Create a new reader over `buf`
    pub const fn new(buf: &'a [u8]) -> ZByteReader<'a>
    {
        ZByteReader {
            stream:   buf,
            position: 0
        }
    }
    /// Return whether the underlying buffer
    /// has `num` bytes left to be read
    pub const fn has(&self, num: usize) -> bool
    {
        self.position.saturating_add(num) <= self.stream.len()
    }
    /// Return the number of unread bytes in the stream
    pub const fn remaining(&self) -> usize
    {
        // Must be saturating to prevent underflow
        self.stream.len().saturating_sub(self.position)
    }
    /// Return `num` bytes from the stream advancing the cursor,
    /// or `None` if the stream does not have that many bytes left
    pub fn get(&mut self, num: usize) -> Option<&'a [u8]>
    {
        match self.stream.get(self.position..self.position + num)
        {
            Some(bytes) =>
            {
                self.position += num;
                Some(bytes)
            }
            None => None
        }
    }
    /// Read a fixed number of bytes known at compile time,
    /// returning an array of zeroes if the stream ran out
    pub fn get_fixed_bytes_or_zero<const N: usize>(&mut self) -> [u8; N]
    {
        let mut bytes = [0; N];

        if let Some(chunk) = self.stream.get(self.position..self.position + N)
        {
            bytes.copy_from_slice(chunk);
            self.position += N;
        }
        bytes
    }
    /// Read a single byte, returning zero if the stream ran out
    #[inline(always)]
    pub fn get_u8(&mut self) -> u8
    {
        match self.stream.get(self.position)
        {
            Some(byte) =>
            {
                self.position += 1;
                *byte
            }
            None => 0
        }
    }
    /// Read a big endian u32, returning zero if the stream
    /// ran out
    #[inline(always)]
    pub fn get_u32_be(&mut self) -> u32
    {
        u32::from_be_bytes(self.get_fixed_bytes_or_zero::<4>())
    }
    /// Return all bytes that have not yet been read
    /// without advancing the cursor
    pub fn remaining_bytes(&self) -> &'a [u8]
    {
        &self.stream[self.position.min(self.stream.len())..]
    }
}
