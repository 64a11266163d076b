//! Hard-coded model catalog.

/// One row of the built-in catalog table.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinEntry {
    pub category: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub filename: &'static str,
    pub size_mb: u32,
}

pub const BUILTIN_ENTRIES: &[BuiltinEntry] = &[
    BuiltinEntry {
        category: "realesrgan",
        name: "x4plus",
        url: "https://github.com/xinntao/Real-ESRGAN/releases/download/v0.1.0/RealESRGAN_x4plus.pth",
        filename: "RealESRGAN_x4plus.pth",
        size_mb: 64,
    },
    BuiltinEntry {
        category: "realesrgan",
        name: "x2plus",
        url: "https://github.com/xinntao/Real-ESRGAN/releases/download/v0.2.1/RealESRGAN_x2plus.pth",
        filename: "RealESRGAN_x2plus.pth",
        size_mb: 64,
    },
    BuiltinEntry {
        category: "realesrgan",
        name: "anime",
        url: "https://github.com/xinntao/Real-ESRGAN/releases/download/v0.2.2.4/RealESRGAN_x4plus_anime_6B.pth",
        filename: "RealESRGAN_x4plus_anime_6B.pth",
        size_mb: 18,
    },
    BuiltinEntry {
        category: "codeformer",
        name: "main",
        url: "https://github.com/sczhou/CodeFormer/releases/download/v0.1.0/codeformer.pth",
        filename: "codeformer.pth",
        size_mb: 360,
    },
    BuiltinEntry {
        category: "codeformer",
        name: "detection",
        url: "https://github.com/xinntao/facexlib/releases/download/v0.1.0/detection_Resnet50_Final.pth",
        filename: "detection_Resnet50_Final.pth",
        size_mb: 105,
    },
    BuiltinEntry {
        category: "codeformer",
        name: "parsing",
        url: "https://github.com/xinntao/facexlib/releases/download/v0.2.2/parsing_parsenet.pth",
        filename: "parsing_parsenet.pth",
        size_mb: 82,
    },
    BuiltinEntry {
        category: "gfpgan",
        name: "v1.3",
        url: "https://github.com/TencentARC/GFPGAN/releases/download/v1.3.0/GFPGANv1.3.pth",
        filename: "GFPGANv1.3.pth",
        size_mb: 332,
    },
    BuiltinEntry {
        category: "gfpgan",
        name: "v1.4",
        url: "https://github.com/TencentARC/GFPGAN/releases/download/v1.3.4/GFPGANv1.4.pth",
        filename: "GFPGANv1.4.pth",
        size_mb: 348,
    },
    BuiltinEntry {
        category: "rife",
        name: "v4.6",
        url: "https://github.com/hzwer/Practical-RIFE/releases/download/4.6/flownet.pkl",
        filename: "flownet.pkl",
        size_mb: 51,
    },
];
