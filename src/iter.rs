use crate::{CodecError, CollectionType, DecodeItemResult, Decoder, ErrorCode};

/// Pulls the child items of one array or map from a [`Decoder`].
///
/// The iterator holds no borrow of the decoder; each call takes it explicitly so a child
/// collection's iterator can be driven in between. Map children alternate key, value.
///
/// The collection's level of the depth budget is released exactly once: when the last child
/// has been read and the next call returns `None`, or by [`CollectionItemIterator::finish`].
/// Dropping an unfinished iterator leaves the level charged for the rest of the decode.
#[derive(Debug, PartialEq, Eq)]
pub struct CollectionItemIterator {
    collection_type: CollectionType,
    remaining: usize,
    depth: usize,
    open: bool,
}

impl CollectionItemIterator {
    pub(crate) const fn new(collection_type: CollectionType, items: usize, depth: usize) -> Self {
        Self {
            collection_type,
            remaining: items,
            depth,
            open: true,
        }
    }

    /// Array or map.
    #[must_use]
    pub const fn collection_type(&self) -> CollectionType {
        self.collection_type
    }

    /// Child items not yet read (keys and values count separately).
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns true once the collection's depth level has been released.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        !self.open
    }

    fn check_current(&self, dec: &Decoder<'_>) -> Result<(), CodecError> {
        if dec.context().current_depth() != self.depth {
            return Err(CodecError::new(
                ErrorCode::CollectionNotFinished,
                dec.position(),
            ));
        }
        Ok(())
    }

    /// Read the next child item.
    ///
    /// Returns `Ok(None)` once every child has been read. An
    /// [`InsufficientInput`](DecodeItemResult::InsufficientInput) outcome is passed through
    /// without advancing, so the call can be repeated when more input exists.
    ///
    /// # Errors
    ///
    /// Returns `CollectionNotFinished` if a child collection is still open, plus any error of
    /// [`Decoder::read_item`].
    pub fn next_item<'a>(
        &mut self,
        dec: &mut Decoder<'a>,
    ) -> Result<Option<DecodeItemResult<'a>>, CodecError> {
        if !self.open {
            return Ok(None);
        }
        self.check_current(dec)?;
        if self.remaining == 0 {
            dec.leave_collection()?;
            self.open = false;
            return Ok(None);
        }
        let item = dec.read_item()?;
        if !matches!(item, DecodeItemResult::InsufficientInput) {
            self.remaining -= 1;
        }
        Ok(Some(item))
    }

    /// Skip every unread child and release the collection's depth level.
    ///
    /// # Errors
    ///
    /// Returns `CollectionNotFinished` if a child collection is still open, plus any error of
    /// [`Decoder::skip_value`]. On error nothing is consumed: the decoder position and
    /// [`remaining`](Self::remaining) are as they were before the call, and an incomplete
    /// child is reported at the position `finish` started from.
    pub fn finish(&mut self, dec: &mut Decoder<'_>) -> Result<(), CodecError> {
        if !self.open {
            return Ok(());
        }
        self.check_current(dec)?;
        let start = dec.position();
        let remaining = self.remaining;
        while self.remaining > 0 {
            if let Err(err) = dec.skip_value() {
                dec.rewind(start);
                self.remaining = remaining;
                if err.is_retryable() {
                    return Err(CodecError::insufficient(start));
                }
                return Err(err);
            }
            self.remaining -= 1;
        }
        if let Err(err) = dec.leave_collection() {
            dec.rewind(start);
            self.remaining = remaining;
            return Err(err);
        }
        self.open = false;
        Ok(())
    }
}
