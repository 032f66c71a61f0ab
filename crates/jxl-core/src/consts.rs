//! Bit-exact constants of the JPEG XL codestream and container formats
//! (ISO/IEC 18181-1 and 18181-2)

/// Naked codestream signature: `0xFF 0x0A`
pub const CODESTREAM_SIGNATURE: [u8; 2] = [0xFF, 0x0A];

/// Container signature box (12 bytes)
///
/// Format: `\0\0\0\x0C JXL \x0D\x0A\x87\x0A`
/// - First 4 bytes: Box size (12 for signature box)
/// - Next 4 bytes: "JXL " (box type)
/// - Last 4 bytes: CR+LF+0x87+LF (corruption detection)
pub const CONTAINER_SIGNATURE: [u8; 12] = [
    0x00, 0x00, 0x00, 0x0C, // Box size = 12
    0x4A, 0x58, 0x4C, 0x20, // "JXL "
    0x0D, 0x0A, 0x87, 0x0A, // CR LF 0x87 LF
];

/// File Type box that must immediately follow the signature box (20 bytes)
pub const FILE_TYPE_BOX: [u8; 20] = [
    0x00, 0x00, 0x00, 0x14, // Box size = 20
    0x66, 0x74, 0x79, 0x70, // "ftyp"
    0x6A, 0x78, 0x6C, 0x20, // Major brand "jxl "
    0x00, 0x00, 0x00, 0x00, // Minor version 0
    0x6A, 0x78, 0x6C, 0x20, // Compatible brand "jxl "
];

/// Number of bytes a sniffer needs to classify a bitstream
pub const PROBE_LEN: usize = CONTAINER_SIGNATURE.len();

/// Offset of the first box after the signature and File Type boxes
pub const FIRST_BOX_OFFSET: usize = CONTAINER_SIGNATURE.len() + FILE_TYPE_BOX.len();

/// `jxl ` brand
pub const BRAND_JXL: [u8; 4] = *b"jxl ";

pub const TYPE_SIGNATURE: [u8; 4] = *b"JXL ";
pub const TYPE_FILE_TYPE: [u8; 4] = *b"ftyp";
/// Level box
pub const TYPE_LEVEL: [u8; 4] = *b"jxll";
/// Full codestream box
pub const TYPE_CODESTREAM: [u8; 4] = *b"jxlc";
/// Partial codestream box
pub const TYPE_PARTIAL_CODESTREAM: [u8; 4] = *b"jxlp";
/// Frame index box
pub const TYPE_FRAME_INDEX: [u8; 4] = *b"jxli";

/// Conformance levels a level box may declare
pub const LEVEL_5: u8 = 5;
pub const LEVEL_10: u8 = 10;

/// Box header sizes
pub const BOX_HEADER_LEN: u64 = 8;
pub const EXTENDED_BOX_HEADER_LEN: u64 = 16;

/// Maximum dimension a size header can express
pub const MAX_IMAGE_DIMENSION: u32 = 1 << 30;
