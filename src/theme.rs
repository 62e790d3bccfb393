use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub dark: bool,
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub accent_primary: Color32,
    pub accent_muted: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub bubble_user: Color32,
    pub bubble_bot: Color32,
    pub avatar_user: Color32,
    pub avatar_bot: Color32,
    pub chip_fill: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub const R8: u8 = 8;
    pub const R12: u8 = 12;
    pub const R18: u8 = 18;
    pub const P4: f32 = 4.0;
    pub const P12: f32 = 12.0;
    pub const P16: f32 = 16.0;

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn light() -> Self {
        Self {
            dark: false,
            surface_0: Color32::from_rgb(0xF8, 0xF9, 0xFC),
            surface_1: Color32::from_rgb(0xFF, 0xFF, 0xFF),
            surface_2: Color32::from_rgb(0xF1, 0xF3, 0xF9),
            accent_primary: Color32::from_rgb(0x4F, 0x46, 0xE5),
            accent_muted: Color32::from_rgb(0x6D, 0x28, 0xD9),
            success: Color32::from_rgb(0x16, 0xA3, 0x4A),
            warning: Color32::from_rgb(0xD9, 0x77, 0x06),
            danger: Color32::from_rgb(0xDC, 0x26, 0x26),
            text_primary: Color32::from_rgb(0x0F, 0x17, 0x2A),
            text_muted: Color32::from_rgb(0x64, 0x74, 0x8B),
            text_on_accent: Color32::WHITE,
            border_subtle: Color32::from_rgb(0xE5, 0xE7, 0xEB),
            bubble_user: Color32::from_rgb(0x4F, 0x46, 0xE5),
            bubble_bot: Color32::from_rgb(0xFF, 0xFF, 0xFF),
            avatar_user: Color32::from_rgb(0x8B, 0x5C, 0xF6),
            avatar_bot: Color32::from_rgb(0x14, 0xB8, 0xA6),
            chip_fill: Color32::from_rgb(0xEE, 0xF2, 0xFF),
        }
    }

    pub fn dark() -> Self {
        Self {
            dark: true,
            surface_0: Color32::from_rgb(0x0B, 0x10, 0x20),
            surface_1: Color32::from_rgb(0x0F, 0x17, 0x2A),
            surface_2: Color32::from_rgb(0x1F, 0x29, 0x37),
            accent_primary: Color32::from_rgb(0x7C, 0x3A, 0xED),
            accent_muted: Color32::from_rgb(0x4F, 0x46, 0xE5),
            success: Color32::from_rgb(0x22, 0xC5, 0x5E),
            warning: Color32::from_rgb(0xF5, 0x9E, 0x0B),
            danger: Color32::from_rgb(0xEF, 0x44, 0x44),
            text_primary: Color32::from_rgb(0xE5, 0xE7, 0xEB),
            text_muted: Color32::from_rgb(0x8B, 0x94, 0x9E),
            text_on_accent: Color32::from_rgb(0xF8, 0xFB, 0xFF),
            border_subtle: Color32::from_rgb(0x1F, 0x29, 0x37),
            bubble_user: Color32::from_rgb(0x7C, 0x3A, 0xED),
            bubble_bot: Color32::from_rgb(0x0B, 0x12, 0x20),
            avatar_user: Color32::from_rgb(0x8B, 0x5C, 0xF6),
            avatar_bot: Color32::from_rgb(0x14, 0xB8, 0xA6),
            chip_fill: Color32::from_rgb(0x1F, 0x29, 0x37),
        }
    }

    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = if self.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        visuals.panel_fill = self.surface_0;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.bg_fill = self.surface_1;
        visuals.widgets.noninteractive.weak_bg_fill = self.surface_1;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.weak_bg_fill = self.surface_2;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent_primary);
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.selection.bg_fill = self.accent_primary;
        visuals.hyperlink_color = self.accent_primary;
        visuals.window_fill = self.surface_1;
        visuals.window_corner_radius = CornerRadius::same(Self::R12);

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        style.spacing.button_padding = egui::vec2(12.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(20.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(13.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(11.0));
        ctx.set_style(style);
    }

    pub fn panel_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::same(Self::P16 as i8))
            .corner_radius(CornerRadius::same(Self::R12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn bubble_frame(&self, from_user: bool) -> Frame {
        let (fill, stroke) = if from_user {
            (self.bubble_user, Stroke::NONE)
        } else {
            (self.bubble_bot, Stroke::new(1.0, self.border_subtle))
        };
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::symmetric(Self::P16 as i8, Self::P12 as i8))
            .corner_radius(CornerRadius::same(14))
            .stroke(stroke)
    }

    pub fn bubble_text(&self, from_user: bool) -> Color32 {
        if from_user {
            self.text_on_accent
        } else {
            self.text_primary
        }
    }
}
