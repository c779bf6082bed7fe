//! Implementaciones en memoria de los puertos: el sink de referencia
//! in-process. Sirven de backend para tests de integración y para el modo
//! demo del CLI, con la misma semántica create-or-reuse que se espera de un
//! servicio real.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::{ClientError, GenerationApi, MarketplaceApi, NewProduct, PageApi, ProductRef, StorageApi};

fn slug_of(title: &str) -> String {
    crate::steps::slugify(title)
}

#[derive(Debug)]
pub struct InMemoryPageApi {
    base_url: String,
    pages: Mutex<HashMap<String, String>>, // title -> url
}

impl InMemoryPageApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(),
               pages: Mutex::new(HashMap::new()) }
    }

    pub fn page_count(&self) -> usize {
        self.pages.lock().expect("pages lock").len()
    }
}

#[async_trait]
impl PageApi for InMemoryPageApi {
    async fn find_page(&self, title: &str) -> Result<Option<String>, ClientError> {
        Ok(self.pages.lock().expect("pages lock").get(title).cloned())
    }

    async fn create_page(&self, title: &str, _body: &str) -> Result<String, ClientError> {
        let mut pages = self.pages.lock().expect("pages lock");
        if pages.contains_key(title) {
            return Err(ClientError::Rejected { status: 409,
                                               body: json!({"code": "already_exists", "title": title}) });
        }
        let url = format!("{}/p/{}", self.base_url, slug_of(title));
        pages.insert(title.to_string(), url.clone());
        Ok(url)
    }
}

#[derive(Debug)]
struct ProductRecord {
    id: String,
    files: HashMap<String, Vec<u8>>,
    published: bool,
}

#[derive(Debug)]
pub struct InMemoryMarketplaceApi {
    base_url: String,
    next_id: AtomicU64,
    products: Mutex<HashMap<String, ProductRecord>>, // permalink -> record
}

impl InMemoryMarketplaceApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(),
               next_id: AtomicU64::new(1),
               products: Mutex::new(HashMap::new()) }
    }

    pub fn product_count(&self) -> usize {
        self.products.lock().expect("products lock").len()
    }

    pub fn file_names(&self, permalink: &str) -> Vec<String> {
        self.products
            .lock()
            .expect("products lock")
            .get(permalink)
            .map(|r| r.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_published(&self, permalink: &str) -> bool {
        self.products
            .lock()
            .expect("products lock")
            .get(permalink)
            .map(|r| r.published)
            .unwrap_or(false)
    }
}

#[async_trait]
impl MarketplaceApi for InMemoryMarketplaceApi {
    async fn lookup_product(&self, permalink: &str) -> Result<Option<ProductRef>, ClientError> {
        Ok(self.products
               .lock()
               .expect("products lock")
               .get(permalink)
               .map(|r| ProductRef { id: r.id.clone(),
                                     permalink: permalink.to_string() }))
    }

    async fn create_product(&self, product: &NewProduct) -> Result<ProductRef, ClientError> {
        let mut products = self.products.lock().expect("products lock");
        if products.contains_key(&product.permalink) {
            return Err(ClientError::Rejected { status: 409,
                                               body: json!({"code": "already_exists",
                                                            "permalink": product.permalink}) });
        }
        let id = format!("prod-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        products.insert(product.permalink.clone(),
                        ProductRecord { id: id.clone(),
                                        files: HashMap::new(),
                                        published: false });
        Ok(ProductRef { id,
                        permalink: product.permalink.clone() })
    }

    async fn attach_file(&self, product_id: &str, file_name: &str, bytes: &[u8]) -> Result<(), ClientError> {
        let mut products = self.products.lock().expect("products lock");
        let record = products.values_mut().find(|r| r.id == product_id);
        match record {
            Some(r) => {
                // mismo nombre de fichero: reemplazo idempotente
                r.files.insert(file_name.to_string(), bytes.to_vec());
                Ok(())
            }
            None => Err(ClientError::Rejected { status: 404,
                                                body: json!({"error": "product not found", "id": product_id}) }),
        }
    }

    async fn publish_product(&self, product_id: &str) -> Result<String, ClientError> {
        let mut products = self.products.lock().expect("products lock");
        let entry = products.iter_mut().find(|(_, r)| r.id == product_id);
        match entry {
            Some((permalink, record)) => {
                record.published = true;
                Ok(format!("{}/l/{}", self.base_url, permalink))
            }
            None => Err(ClientError::Rejected { status: 404,
                                                body: json!({"error": "product not found", "id": product_id}) }),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStorageApi {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorageApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("objects lock").len()
    }
}

#[async_trait]
impl StorageApi for InMemoryStorageApi {
    async fn upload(&self, path: &str, bytes: &[u8], overwrite: bool) -> Result<String, ClientError> {
        let mut objects = self.objects.lock().expect("objects lock");
        if !overwrite && objects.contains_key(path) {
            return Err(ClientError::Rejected { status: 409,
                                               body: json!({"code": "already_exists", "path": path}) });
        }
        objects.insert(path.to_string(), bytes.to_vec());
        Ok(format!("mem://{path}"))
    }
}

/// Generador enlatado: devuelve siempre la misma respuesta. Útil en tests y
/// en el modo demo del CLI.
#[derive(Debug, Clone)]
pub struct CannedGenerationApi {
    response: String,
}

impl CannedGenerationApi {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

#[async_trait]
impl GenerationApi for CannedGenerationApi {
    async fn generate(&self, _prompt: &str) -> Result<String, ClientError> {
        Ok(self.response.clone())
    }
}
