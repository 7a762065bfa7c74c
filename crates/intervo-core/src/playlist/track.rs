use super::locator::PlayableRef;

/// A named audio payload handed over by the upload boundary.
///
/// The boundary has already checked that the file was readable; nothing about
/// its format is checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// One loaded playlist entry. Its bytes live in the
/// [`LocatorStore`](super::LocatorStore) behind `reference`.
#[derive(Debug)]
pub struct Track {
    name: String,
    reference: PlayableRef,
}

impl Track {
    pub(crate) fn new(name: String, reference: PlayableRef) -> Self {
        Self { name, reference }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> &PlayableRef {
        &self.reference
    }

    pub(crate) fn into_reference(self) -> PlayableRef {
        self.reference
    }
}
