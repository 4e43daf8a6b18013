//! User-facing text. Defaults are Turkish; any entry can be overridden from the
//! `messages` section of the config file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTable {
    pub user_label: String,
    pub assistant_label: String,
    pub welcome: String,
    pub empty_input: String,
    /// `{limit}` is replaced with the configured character limit
    pub over_length: String,
    pub network_failure: String,
    pub backend_fallback: String,
    pub send_failed_prefix: String,
    pub typing: String,
    pub clear_confirm: String,
    pub history_cleared: String,
    pub clear_failed: String,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self {
            user_label: "Sen".to_string(),
            assistant_label: "KumTanesi".to_string(),
            welcome: "Merhaba! Ben KumTanesi, sizin AI asistanınızım. 🌟\n\n\
                      Size nasıl yardımcı olabilirim? Her türlü sorunuza yanıt verebilir, \
                      konuşabiliriz veya ihtiyacınız olan bilgileri sağlayabilirim.\n\n\
                      Başlamak için bana bir şeyler sorun! 😊"
                .to_string(),
            empty_input: "Lütfen bir mesaj yazın.".to_string(),
            over_length: "Mesaj çok uzun. Lütfen {limit} karakterden az yazın.".to_string(),
            network_failure: "Bağlantı hatası. İnternet bağlantınızı kontrol edin.".to_string(),
            backend_fallback: "Bir hata oluştu. Lütfen tekrar deneyin.".to_string(),
            send_failed_prefix: "Mesaj gönderilemedi: ".to_string(),
            typing: "KumTanesi yazıyor".to_string(),
            clear_confirm: "Konuşma geçmişini temizlemek istediğinizden emin misiniz?".to_string(),
            history_cleared: "Konuşma geçmişi temizlendi.".to_string(),
            clear_failed: "Geçmiş temizlenemedi.".to_string(),
        }
    }
}

impl MessageTable {
    pub fn over_length_text(&self, limit: usize) -> String {
        self.over_length.replace("{limit}", &limit.to_string())
    }
}
