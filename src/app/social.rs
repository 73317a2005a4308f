use serde::Serialize;

/// Preset crop formats for the social-share image tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialFormat {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: &'static str,
}

pub const SOCIAL_FORMATS: &[SocialFormat] = &[
    SocialFormat {
        name: "Instagram Square (1:1)",
        width: 1080,
        height: 1080,
        aspect_ratio: "1:1",
    },
    SocialFormat {
        name: "Instagram Portrait (4:5)",
        width: 1080,
        height: 1350,
        aspect_ratio: "4:5",
    },
    SocialFormat {
        name: "Twitter Post (16:9)",
        width: 1200,
        height: 675,
        aspect_ratio: "16:9",
    },
    SocialFormat {
        name: "Twitter Header (3:1)",
        width: 1500,
        height: 500,
        aspect_ratio: "3:1",
    },
    SocialFormat {
        name: "Facebook Cover (205:78)",
        width: 820,
        height: 312,
        aspect_ratio: "205:78",
    },
];

pub fn find_format(name: &str) -> Option<&'static SocialFormat> {
    SOCIAL_FORMATS.iter().find(|format| format.name == name)
}

/// Sink transformation that fills the target frame, cropping around the
/// subject.
pub fn fill_crop_transformation(format: &SocialFormat) -> String {
    format!("c_fill,g_auto,w_{},h_{}", format.width, format.height)
}
