//! Initialize a new kiji site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::Site;

const CONFIG_TEMPLATE: &str = r#"# kiji configuration

# Site
title: kiji
description: ''
language: ja
timezone: Asia/Tokyo

# URL
url: http://example.com
root: /

# Directory
content_dir: src/content
data_dir: public
public_dir: dist
extension: mdx

# Listing pages
per_page: 9

highlight:
  enable: true
  theme: InspiredGitHub
  line_number: false

# Collections and datasets default to articles/topics/guides and
# interviews/guides/topics/glossary. Override them as a whole, e.g.:
#
# collections:
#   - name: articles
#     dir: articles
#     route: manual
#     label: マニュアル
#     components: [InlineToc]
#
# datasets:
#   - name: interviews
#     file: interviews.json
#     route: interviews
#     kind: interviews
"#;

const SAMPLE_DOCUMENT: &str = r#"---
title: はじめに
date: {{ date }}
excerpt: kiji で最初の記事を書いてみましょう。
category: 基本
tags: [kiji]
---

<InlineToc />

## 記事を書く

`src/content/articles` に `.mdx` ファイルを置くと `/manual/<slug>` に公開されます。

## 一覧を作る

`public/*.json` に記事カードの配列を置くと一覧ページになります。
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Already initialized: {:?}", config_path);
    }

    fs::create_dir_all(target_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let site = Site::with_config(target_dir.to_path_buf(), SiteConfig::default());

    for collection in &site.config.collections {
        fs::create_dir_all(site.content_dir.join(&collection.dir))?;
    }

    fs::create_dir_all(&site.data_dir)?;
    for dataset in &site.config.datasets {
        let path = site.dataset_path(dataset);
        if !path.exists() {
            fs::write(&path, "[]\n")?;
        }
    }

    let now = chrono::Local::now();
    let sample = SAMPLE_DOCUMENT.replace("{{ date }}", &now.format("%Y-%m-%d").to_string());
    if let Some(articles) = site.collections().first() {
        fs::write(articles.root.join(format!("hello.{}", site.config.extension)), sample)?;
    }

    Ok(())
}

/// Run the init command with an existing site
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}
