//! Tantivy-backed job index
//!
//! Each job is one tantivy document keyed by the `id` fast field. Upserts
//! delete the id term before adding, so re-indexing a job replaces it. The
//! full [`JobDocument`] is kept as stored JSON in `source` and is what
//! [`IndexClient::get`] and search hits are rebuilt from.

use std::ops::Bound;
use std::path::Path;

use parking_lot::Mutex;
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query, RangeQuery, TermQuery};
use tantivy::schema::{FAST, Field, INDEXED, IndexRecordOption, STORED, Schema, TEXT, Value};
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, trace};

use crate::config::IndexConfig;
use crate::core::Pagination;
use crate::error::{JobSearchError, Result};
use crate::search::client::{IndexClient, IndexSession, ItemError};
use crate::search::document::JobDocument;
use crate::search::filters::{SearchCriteria, SearchResult, tokenize};

#[derive(Debug, Clone, Copy)]
struct JobFields {
    id: Field,
    title: Field,
    description: Field,
    industry: Field,
    location: Field,
    company_name: Field,
    requirements: Field,
    job_skills: Field,
    salary_min: Field,
    salary_max: Field,
    source: Field,
}

impl JobFields {
    fn from_schema(schema: &Schema) -> Result<Self> {
        Ok(Self {
            id: schema.get_field("id")?,
            title: schema.get_field("title")?,
            description: schema.get_field("description")?,
            industry: schema.get_field("industry")?,
            location: schema.get_field("location")?,
            company_name: schema.get_field("company_name")?,
            requirements: schema.get_field("requirements")?,
            job_skills: schema.get_field("job_skills")?,
            salary_min: schema.get_field("salary_min")?,
            salary_max: schema.get_field("salary_max")?,
            source: schema.get_field("source")?,
        })
    }

    fn id_term(&self, job_id: i64) -> Term {
        Term::from_field_i64(self.id, job_id)
    }

    fn to_tantivy(&self, doc: &JobDocument) -> Result<TantivyDocument> {
        let mut document = TantivyDocument::default();
        document.add_i64(self.id, doc.id);
        document.add_text(self.title, &doc.title);
        document.add_text(self.description, &doc.description);
        document.add_text(self.industry, &doc.industry);
        document.add_text(self.location, &doc.location);
        document.add_text(self.company_name, &doc.company_name);
        document.add_text(self.requirements, &doc.requirements);
        for skill in &doc.job_skills {
            document.add_text(self.job_skills, skill);
        }
        document.add_i64(self.salary_min, doc.salary_min);
        document.add_i64(self.salary_max, doc.salary_max);
        document.add_text(self.source, doc.to_source()?);
        Ok(document)
    }
}

fn job_schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_i64_field("id", INDEXED | STORED | FAST);
    builder.add_text_field("title", TEXT);
    builder.add_text_field("description", TEXT);
    builder.add_text_field("industry", TEXT);
    builder.add_text_field("location", TEXT);
    builder.add_text_field("company_name", TEXT);
    builder.add_text_field("requirements", TEXT);
    builder.add_text_field("job_skills", TEXT);
    builder.add_i64_field("salary_min", INDEXED | FAST);
    builder.add_i64_field("salary_max", INDEXED | FAST);
    builder.add_text_field("source", STORED);
    builder.build()
}

/// Job search index on disk or in RAM.
pub struct JobIndex {
    index: Index,
    reader: IndexReader,
    fields: JobFields,
    writer_heap_bytes: usize,
    writer_threads: usize,
}

impl JobIndex {
    /// Open or create an index in `path`.
    pub fn open(path: impl AsRef<Path>, config: &IndexConfig) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let directory = MmapDirectory::open(path).map_err(tantivy::TantivyError::from)?;
        let index = Index::open_or_create(directory, job_schema())?;
        debug!(path = %path.display(), "opened job index");
        Self::from_index(index, config)
    }

    /// Volatile index, used by tests and dry runs.
    pub fn open_in_ram(config: &IndexConfig) -> Result<Self> {
        Self::from_index(Index::create_in_ram(job_schema()), config)
    }

    fn from_index(index: Index, config: &IndexConfig) -> Result<Self> {
        let fields = JobFields::from_schema(&index.schema())?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(Self {
            index,
            reader,
            fields,
            writer_heap_bytes: config.writer_heap_bytes,
            writer_threads: config.writer_threads,
        })
    }

    fn writer(&self) -> Result<IndexWriter> {
        self.index
            .writer_with_num_threads(self.writer_threads, self.writer_heap_bytes)
            .map_err(|err| JobSearchError::IndexUnavailable(err.to_string()))
    }

    fn build_query(&self, criteria: &SearchCriteria) -> Box<dyn Query> {
        let f = self.fields;
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        if let Some(text) = &criteria.text {
            for token in tokenize(text) {
                let either: Vec<(Occur, Box<dyn Query>)> = vec![
                    (Occur::Should, term_query(f.title, &token)),
                    (Occur::Should, term_query(f.description, &token)),
                ];
                clauses.push((Occur::Must, Box::new(BooleanQuery::new(either))));
            }
        }
        for (field, value) in [(f.industry, &criteria.industry), (f.location, &criteria.location)] {
            if let Some(value) = value {
                for token in tokenize(value) {
                    clauses.push((Occur::Must, term_query(field, &token)));
                }
            }
        }
        if let Some(floor) = criteria.salary_floor {
            let range = RangeQuery::new(
                Bound::Included(Term::from_field_i64(f.salary_max, floor)),
                Bound::Unbounded,
            );
            clauses.push((Occur::Must, Box::new(range)));
        }
        if let Some(ceiling) = criteria.salary_ceiling {
            let range = RangeQuery::new(
                Bound::Unbounded,
                Bound::Included(Term::from_field_i64(f.salary_min, ceiling)),
            );
            clauses.push((Occur::Must, Box::new(range)));
        }

        if clauses.is_empty() {
            Box::new(AllQuery)
        } else {
            Box::new(BooleanQuery::new(clauses))
        }
    }

    fn load_document(&self, searcher: &tantivy::Searcher, addr: DocAddress) -> Result<JobDocument> {
        let stored: TantivyDocument = searcher.doc(addr)?;
        let source = stored
            .get_first(self.fields.source)
            .and_then(|v| v.as_str())
            .ok_or_else(|| JobSearchError::Serialization("document without source".into()))?;
        JobDocument::from_source(source)
    }
}

fn term_query(field: Field, token: &str) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_text(field, token),
        IndexRecordOption::WithFreqs,
    ))
}

impl IndexClient for JobIndex {
    fn open_session(&self) -> Result<Box<dyn IndexSession>> {
        let writer = self.writer()?;
        Ok(Box::new(TantivySession {
            writer: Mutex::new(writer),
            reader: self.reader.clone(),
            fields: self.fields,
        }))
    }

    fn get(&self, job_id: i64) -> Result<Option<JobDocument>> {
        let searcher = self.reader.searcher();
        let query = TermQuery::new(self.fields.id_term(job_id), IndexRecordOption::Basic);
        let hits = searcher.search(&query, &TopDocs::with_limit(1))?;
        hits.first()
            .map(|(_, addr)| self.load_document(&searcher, *addr))
            .transpose()
    }

    fn delete(&self, job_id: i64) -> Result<bool> {
        let existed = self.get(job_id)?.is_some();
        let mut writer = self.writer()?;
        writer.delete_term(self.fields.id_term(job_id));
        writer.commit()?;
        self.reader.reload()?;
        Ok(existed)
    }

    fn search(&self, criteria: &SearchCriteria, page: Pagination) -> Result<Vec<SearchResult>> {
        if page.limit() == 0 {
            return Ok(Vec::new());
        }
        let searcher = self.reader.searcher();
        // TopDocs buffers limit + offset hits; past the last document there is nothing to collect
        if u64::try_from(page.offset()).unwrap_or(u64::MAX) >= searcher.num_docs() {
            return Ok(Vec::new());
        }
        let query = self.build_query(criteria);
        let collector = TopDocs::with_limit(page.limit()).and_offset(page.offset());
        let hits = searcher.search(query.as_ref(), &collector)?;
        trace!(hits = hits.len(), "index search");

        hits.into_iter()
            .map(|(score, addr)| {
                let doc = self.load_document(&searcher, addr)?;
                Ok(SearchResult::from_document(&doc, score))
            })
            .collect()
    }

    fn count(&self) -> Result<u64> {
        Ok(self.reader.searcher().num_docs())
    }
}

/// One tantivy writer shared by the bulk workers.
struct TantivySession {
    writer: Mutex<IndexWriter>,
    reader: IndexReader,
    fields: JobFields,
}

impl IndexSession for TantivySession {
    fn upsert(&self, doc: &JobDocument) -> std::result::Result<(), ItemError> {
        let document = self
            .fields
            .to_tantivy(doc)
            .map_err(|err| ItemError::new(err.to_string()))?;
        // delete + add must not interleave with another upsert of the same id
        let writer = self.writer.lock();
        writer.delete_term(self.fields.id_term(doc.id));
        writer
            .add_document(document)
            .map_err(|err| ItemError::new(err.to_string()))?;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.writer.lock().commit()?;
        self.reader.reload()?;
        Ok(())
    }
}
