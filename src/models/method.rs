use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five transformation intents a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationMethod {
    Describe,
    Reference,
    Edit,
    AddDecoration,
    #[default]
    RemoveObject,
}

impl GenerationMethod {
    pub const ALL: [GenerationMethod; 5] = [
        GenerationMethod::RemoveObject,
        GenerationMethod::Reference,
        GenerationMethod::AddDecoration,
        GenerationMethod::Edit,
        GenerationMethod::Describe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::Describe => "describe",
            GenerationMethod::Reference => "reference",
            GenerationMethod::Edit => "edit",
            GenerationMethod::AddDecoration => "addDecoration",
            GenerationMethod::RemoveObject => "removeObject",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GenerationMethod::Describe => "描述空間",
            GenerationMethod::Reference => "使用參考圖片",
            GenerationMethod::Edit => "編輯空間",
            GenerationMethod::AddDecoration => "新增裝飾品",
            GenerationMethod::RemoveObject => "移除物件",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GenerationMethod::Describe => "透過文字描述您想要的風格",
            GenerationMethod::Reference => "上傳圖片作為風格參考",
            GenerationMethod::Edit => "透過文字指令修改現有空間",
            GenerationMethod::AddDecoration => "將裝飾品放置到現有場景中",
            GenerationMethod::RemoveObject => "移除圖片中的物件並填補背景",
        }
    }

    /// What the primary photo should look like for this method.
    pub fn upload_hint(&self) -> &'static str {
        match self {
            GenerationMethod::AddDecoration => "上傳一張您想要加入裝飾品的空間照片。",
            GenerationMethod::Edit => "上傳一張您想要編輯的空間照片。",
            GenerationMethod::RemoveObject => "上傳一張您想要移除物件的空間照片。",
            GenerationMethod::Reference | GenerationMethod::Describe => {
                "為獲得最佳效果，請使用素色或白色背景的照片。"
            }
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "describe" => Ok(GenerationMethod::Describe),
            "reference" => Ok(GenerationMethod::Reference),
            "edit" => Ok(GenerationMethod::Edit),
            "adddecoration" => Ok(GenerationMethod::AddDecoration),
            "removeobject" => Ok(GenerationMethod::RemoveObject),
            _ => Err(format!(
                "unknown generation method '{}', expected one of: describe, reference, edit, add-decoration, remove-object",
                s
            )),
        }
    }
}

macro_rules! labelled_options {
    ($(#[$meta:meta])* $name:ident, default = $default:ident, { $($variant:ident => ($label:literal, $zh:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// English option name, as used in prompts.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Display name shown to users.
            pub fn localized(&self) -> &'static str {
                match self {
                    $($name::$variant => $zh),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| {
                        option.label().eq_ignore_ascii_case(wanted)
                            || option.label().replace(' ', "-").eq_ignore_ascii_case(wanted)
                            || option.localized() == wanted
                    })
                    .ok_or_else(|| {
                        let known: Vec<&str> = $name::ALL.iter().map(|o| o.label()).collect();
                        format!("unknown option '{}', expected one of: {}", s, known.join(", "))
                    })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

labelled_options!(
    /// Kind of room a described space should be.
    SpaceOption, default = LivingRoom, {
        LivingRoom => ("Living Room", "客廳"),
        Bedroom => ("Bedroom", "臥室"),
        DiningRoom => ("Dining Room", "餐廳"),
        Office => ("Office", "辦公室"),
        OutdoorPatio => ("Outdoor Patio", "戶外庭院"),
        Kitchen => ("Kitchen", "廚房"),
    }
);

labelled_options!(
    /// Interior design style for a described space.
    StyleOption, default = Modern, {
        Modern => ("Modern", "現代風"),
        Minimalist => ("Minimalist", "極簡風"),
        Scandinavian => ("Scandinavian", "北歐風"),
        Industrial => ("Industrial", "工業風"),
        Bohemian => ("Bohemian", "波希米亞風"),
        Coastal => ("Coastal", "海岸風"),
        Farmhouse => ("Farmhouse", "農舍風"),
        Japandi => ("Japandi", "日式禪風"),
        Mediterranean => ("Mediterranean", "地中海風"),
        ArtDeco => ("Art Deco", "裝飾藝術風"),
        MidCenturyModern => ("Mid-Century Modern", "世紀中期現代風"),
        FrenchCountry => ("French Country", "法式鄉村風"),
        Rustic => ("Rustic", "鄉村風"),
    }
);
