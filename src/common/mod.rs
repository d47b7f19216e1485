pub mod host;

pub use host::{
    DirectorySink, Download, DownloadBody, DownloadSink, HostCapabilities, LoadingIndicator,
    Notifier, SoundCue,
};
