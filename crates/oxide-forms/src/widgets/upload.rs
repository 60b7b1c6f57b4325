//! File upload widget backed by a temporary store.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::{html_escape, plaintext, RenderContext, Widget};
use crate::controls::{END, START};
use crate::i18n::TranslationString;
use crate::schema::Field;
use crate::tmpstore::TmpStore;
use crate::value::{Cstruct, FileData};

/// File input that keeps uploads in a [`TmpStore`] so they survive a
/// failed validation.
///
/// The rendered controls are a mapping of `upload` (the file input) and
/// `uid` (a hidden input naming the stored file).
#[derive(Clone)]
pub struct FileUpload {
    tmpstore: Arc<dyn TmpStore>,
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload").finish_non_exhaustive()
    }
}

impl FileUpload {
    /// Creates the widget.
    pub fn new(tmpstore: Arc<dyn TmpStore>) -> Self {
        Self { tmpstore }
    }

    fn current(&self, cstruct: &Cstruct) -> Option<FileData> {
        match cstruct {
            Cstruct::File(file) => Some(file.clone()),
            Cstruct::Map(_) => {
                let uid = cstruct.str_at("uid");
                if uid.is_empty() {
                    None
                } else {
                    self.tmpstore.get(uid)
                }
            }
            _ => None,
        }
    }
}

impl Widget for FileUpload {
    fn render(&self, field: &Field, cstruct: &Cstruct, ctx: &RenderContext<'_>) -> String {
        let current = self.current(cstruct);

        if ctx.readonly() {
            return plaintext(ctx, current.as_ref().map_or("", |f| f.filename.as_str()));
        }

        let name = html_escape(&field.name);
        let mut html = format!(r#"<input type="hidden" name="{START}" value="{name}:mapping">"#);
        if let Some(file) = &current {
            let shown = match &file.preview_url {
                Some(url) => format!(
                    r#"<a href="{}">{}</a>"#,
                    html_escape(url),
                    html_escape(&file.filename)
                ),
                None => html_escape(&file.filename),
            };
            html.push_str(&format!(r#"<div class="form-text mb-1">{shown}</div>"#));
        }
        html.push_str(&format!(
            r#"<input type="file" class="{}" id="{}" name="upload">"#,
            ctx.input_class("form-control"),
            ctx.oid()
        ));
        html.push_str(&format!(
            r#"<input type="hidden" name="uid" value="{}">"#,
            html_escape(current.as_ref().map_or("", |f| f.uid.as_str()))
        ));
        html.push_str(&format!(r#"<input type="hidden" name="{END}" value="{name}:mapping">"#));
        html
    }

    fn deserialize(
        &self,
        _field: &Field,
        pstruct: Option<&Cstruct>,
    ) -> Result<Cstruct, TranslationString> {
        let submitted = match pstruct {
            None | Some(Cstruct::Null) => return Ok(Cstruct::Null),
            Some(file @ Cstruct::File(_)) => return Ok(file.clone()),
            Some(map @ Cstruct::Map(_)) => map,
            Some(other) => {
                return Err(TranslationString::new("${val} is not a file upload")
                    .with("val", other.describe()))
            }
        };

        let uid = submitted.str_at("uid");

        match submitted.get("upload") {
            Some(Cstruct::Upload(upload)) if !upload.filename.is_empty() => {
                let uid = if uid.is_empty() {
                    Uuid::new_v4().simple().to_string()
                } else {
                    uid.to_string()
                };
                let file = FileData {
                    filename: upload.filename.clone(),
                    mimetype: upload.mimetype.clone(),
                    size: upload.data.len(),
                    preview_url: self.tmpstore.preview_url(&uid),
                    uid: uid.clone(),
                    data: upload.data.clone(),
                };
                debug!(uid = %uid, filename = %file.filename, size = file.size, "Storing upload");
                self.tmpstore.insert(&uid, file.clone());
                Ok(Cstruct::File(file))
            }
            _ if uid.is_empty() => Ok(Cstruct::Null),
            _ => Ok(self.tmpstore.get(uid).map_or(Cstruct::Null, Cstruct::File)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    use super::*;
    use crate::i18n::NullTranslator;
    use crate::value::Upload;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, FileData>>);

    impl TmpStore for MapStore {
        fn get(&self, uid: &str) -> Option<FileData> {
            self.0.lock().unwrap().get(uid).cloned()
        }

        fn insert(&self, uid: &str, file: FileData) {
            self.0.lock().unwrap().insert(uid.to_string(), file);
        }

        fn remove(&self, uid: &str) -> Option<FileData> {
            self.0.lock().unwrap().remove(uid)
        }

        fn clear(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    fn submitted(upload: Option<Upload>, uid: &str) -> Cstruct {
        let mut map = BTreeMap::new();
        map.insert(
            "upload".to_string(),
            upload.map_or_else(|| Cstruct::from(""), Cstruct::Upload),
        );
        map.insert("uid".to_string(), Cstruct::from(uid));
        Cstruct::Map(map)
    }

    fn upload() -> Upload {
        Upload {
            filename: "notes.txt".to_string(),
            mimetype: Some("text/plain".to_string()),
            data: b"hello".to_vec(),
        }
    }

    #[test]
    fn test_new_upload_is_stored() {
        let store = Arc::new(MapStore::default());
        let widget = FileUpload::new(store.clone());
        let field = Field::file("upload", store.clone());

        let Ok(Cstruct::File(file)) = widget.deserialize(&field, Some(&submitted(Some(upload()), ""))) else {
            panic!("expected a stored file");
        };
        assert_eq!(file.filename, "notes.txt");
        assert_eq!(file.size, 5);
        assert_eq!(file.uid.len(), 32);
        assert_eq!(store.get(&file.uid), Some(file));
    }

    #[test]
    fn test_existing_uid_is_recovered() {
        let store = Arc::new(MapStore::default());
        let widget = FileUpload::new(store.clone());
        let field = Field::file("upload", store.clone());

        let Ok(Cstruct::File(first)) = widget.deserialize(&field, Some(&submitted(Some(upload()), ""))) else {
            panic!("expected a stored file");
        };
        let again = widget.deserialize(&field, Some(&submitted(None, &first.uid)));
        assert_eq!(again, Ok(Cstruct::File(first)));
    }

    #[test]
    fn test_unknown_uid_and_empty_submission() {
        let store = Arc::new(MapStore::default());
        let widget = FileUpload::new(store.clone());
        let field = Field::file("upload", store);

        assert_eq!(widget.deserialize(&field, Some(&submitted(None, "nope"))), Ok(Cstruct::Null));
        assert_eq!(widget.deserialize(&field, Some(&submitted(None, ""))), Ok(Cstruct::Null));
        assert_eq!(widget.deserialize(&field, None), Ok(Cstruct::Null));
    }

    #[test]
    fn test_render_keeps_uid() {
        let store = Arc::new(MapStore::default());
        let widget = FileUpload::new(store.clone());
        let field = Field::file("upload", store);
        let Ok(stored) = widget.deserialize(&field, Some(&submitted(Some(upload()), "abc"))) else {
            panic!("expected a stored file");
        };

        let ctx = RenderContext::new(&NullTranslator, None, false);
        let html = ctx.with_child("upload", |ctx| widget.render(&field, &stored, ctx));
        assert!(html.contains(r#"name="uid" value="abc""#));
        assert!(html.contains("notes.txt"));
        assert!(html.contains(r#"type="file""#));
        assert!(html.contains(r#"value="upload:mapping""#));
    }
}
