/// Severity of an [`InfoDialog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// Modal message box: title bar text, bold header, body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoDialog {
    pub kind: DialogKind,
    pub title: String,
    pub header: String,
    pub body: String,
}

impl InfoDialog {
    pub fn info(title: &str, header: &str, body: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.to_owned(),
            header: header.to_owned(),
            body: body.into(),
        }
    }

    pub fn error(title: &str, header: &str, body: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.to_owned(),
            header: header.to_owned(),
            body: body.into(),
        }
    }

    pub fn about() -> Self {
        Self::info(
            "About",
            "Advanced Media Player v1.0",
            "Features:\n\
             • Video Playback (FFmpeg)\n\
             • ML-powered Subtitle Generation\n\
             • Code Extraction from Videos (OCR)\n\n\
             Built with egui",
        )
    }

    pub fn documentation() -> Self {
        Self::info(
            "Documentation",
            "Keyboard Shortcuts",
            "Space\tPlay / Pause\n\
             S\tStop\n\
             ← / →\tSeek 5 seconds\n\
             ↑ / ↓\tVolume\n\
             M\tMute\n\
             F\tFullscreen\n\
             N / P\tNext / Previous\n\
             Tab\tShow / hide side panel\n\n\
             Drop a video file on the window to open it.",
        )
    }
}

/// Features that exist only as menu entries so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedFeature {
    Subtitles,
    CodeExtraction,
}

impl PlannedFeature {
    pub fn dialog(self) -> InfoDialog {
        match self {
            Self::Subtitles => InfoDialog::info(
                "Generate Subtitles",
                "ML Subtitle Generation",
                "This feature will use machine learning (Whisper model) to generate subtitles.\n\n\
                 Implementation coming in next phase!",
            ),
            Self::CodeExtraction => InfoDialog::info(
                "Extract Code",
                "Code Extraction (OCR)",
                "This feature will use OCR to extract code from video frames.\n\n\
                 Implementation coming in next phase!",
            ),
        }
    }
}
