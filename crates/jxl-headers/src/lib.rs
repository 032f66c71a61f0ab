//! JPEG XL container and header parsing
//!
//! - [`sniff`] tells a naked codestream from a boxed container
//! - [`container`] walks the boxes of a container
//! - [`reassemble`] validates a container and extracts its codestream
//! - [`size_header`] decodes the image dimensions at the start of a codestream

pub mod container;
pub mod reassemble;
pub mod size_header;
pub mod sniff;

pub use container::{
    parse_box, write_box, write_container_header, BoxType, Boxes, JxlBox,
};
pub use reassemble::{
    reassemble, BoxSummary, ContainerSummary, ContainerWarning, PartialCodestreamChunk,
    Reassembled,
};
pub use size_header::{AspectRatio, SizeHeader};
pub use sniff::sniff;
