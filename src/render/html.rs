use crate::render::Report;
use crate::{Error, Result};

/// Render a self-contained HTML page for a view report (data embedded as JSON).
///
/// The template is filled with `replace` instead of `format!()` because the
/// JS template literals (`${x}`) would clash with Rust formatting braces.
pub fn render_html_report(report: &Report<'_>) -> Result<String> {
    // "</" inside a JSON string would close the <script> element early.
    let json = serde_json::to_string(report)
        .map_err(Error::Render)?
        .replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Live state</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .container { display: flex; height: calc(100vh - 58px); }
  .wrapper { flex: 1; display: flex; justify-content: center; overflow: hidden; }
  .state-view { position: relative; overflow: auto; }
  .sidebar { width: 360px; border-left: 1px solid #ddd; padding: 12px; overflow: auto; }

  .node { position: absolute; box-sizing: border-box; border: 1px solid #ccc; border-radius: 4px;
          background: white; padding: 8px 12px; cursor: pointer; z-index: 1; overflow: hidden; }
  .node.selected { border-color: #4a90e2; background: #e9f2ff; }
  .node .kind { font-size: 12px; color: #777; }
  .node .name { font-size: 14px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
  .health { display: inline-block; width: 8px; height: 8px; border-radius: 50%; margin-right: 6px; }
  .HEALTHY { background: #2ca02c; } .UNHEALTHY { background: #d62728; }
  .OTHER { background: #ff7f0e; } .UNKNOWN { background: #999; }
  svg.edge { position: absolute; }
  polyline { fill: transparent; stroke: #ccc; }

  .kind-row { display: flex; gap: 8px; align-items: center; font-size: 14px; padding: 2px 0; }
  .muted { color: #777; font-size: 12px; }
  table { border-collapse: collapse; width: 100%; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; }
  .unavailable { padding: 24px; color: #d62728; }
  .detail-head { display: flex; justify-content: space-between; align-items: center; }
  #closeDetail { border: none; background: none; font-size: 18px; cursor: pointer; color: #777; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<div class="container">
  <div class="wrapper">
    <div class="state-view" id="stateView"></div>
  </div>
  <div class="sidebar">
    <h3>Kinds</h3>
    <div id="kinds"></div>
    <div class="detail-head">
      <h3 id="title">Select a resource</h3>
      <button id="closeDetail" type="button" title="Close" style="display:none;">&times;</button>
    </div>
    <div id="meta" class="muted"></div>
    <table id="detail" style="display:none;"><tbody id="detailBody"></tbody></table>
  </div>
</div>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

const state = { selected: DATA.selected ? DATA.selected.id : null };

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function renderSummary() {
  const f = DATA.frame;
  const el = document.getElementById("summary");
  el.innerHTML = `
    <span class="pill">platform: <b>${escapeHtml(DATA.platform)}</b></span>
    <span class="pill">collection: <b>${escapeHtml(DATA.collection || "-")}</b></span>
    <span class="pill">visible nodes: <b>${f ? f.nodes.length : 0}</b></span>
    <span class="pill">visible edges: <b>${f ? f.edges.length : 0}</b></span>
  `;
}

function renderKinds() {
  const root = document.getElementById("kinds");
  root.innerHTML = "";
  for (const k of DATA.kinds) {
    const row = document.createElement("div");
    row.className = "kind-row";
    row.innerHTML = `<input type="checkbox" disabled ${k.visible ? "checked" : ""}>
      <span>${escapeHtml(k.kind || "(none)")}</span> <span class="muted">${k.count}</span>`;
    root.appendChild(row);
  }
}

function renderGraph() {
  const root = document.getElementById("stateView");
  root.innerHTML = "";

  if (!DATA.frame) {
    root.innerHTML = `<div class="unavailable">Live state unavailable: ${escapeHtml(DATA.unavailable || "")}</div>`;
    return;
  }

  for (const n of DATA.frame.nodes) {
    const box = document.createElement("div");
    box.className = "node" + (state.selected === n.id ? " selected" : "");
    box.style.left = n.x + "px";
    box.style.top = n.y + "px";
    box.style.width = DATA.nodeWidth + "px";
    box.style.height = DATA.nodeHeight + "px";
    box.onclick = () => selectResource(n.resource);
    box.innerHTML = `
      <div class="kind">${escapeHtml(n.resource.kind)}</div>
      <div class="name"><span class="health ${n.resource.healthStatus}"></span>${escapeHtml(n.resource.name)}</div>
    `;
    root.appendChild(box);
  }

  const ns = "http://www.w3.org/2000/svg";
  for (const e of DATA.frame.edges) {
    const svg = document.createElementNS(ns, "svg");
    svg.setAttribute("class", "edge");
    svg.setAttribute("width", e.width);
    svg.setAttribute("height", e.height);
    svg.style.top = e.top + "px";
    svg.style.left = e.left + "px";
    const line = document.createElementNS(ns, "polyline");
    line.setAttribute("points", e.points);
    line.setAttribute("stroke-width", DATA.strokeWidth);
    svg.appendChild(line);
    root.appendChild(svg);
  }

  const spacer = document.createElement("div");
  spacer.style.width = DATA.frame.canvas.width + "px";
  spacer.style.height = DATA.frame.canvas.height + "px";
  root.appendChild(spacer);
}

function selectResource(r) {
  state.selected = r ? r.id : null;
  const body = document.getElementById("detailBody");
  const tbl = document.getElementById("detail");
  const close = document.getElementById("closeDetail");
  body.innerHTML = "";

  if (!r) {
    document.getElementById("title").textContent = "Select a resource";
    document.getElementById("meta").textContent = "";
    tbl.style.display = "none";
    close.style.display = "none";
    renderGraph();
    return;
  }

  document.getElementById("title").textContent = r.name;
  document.getElementById("meta").textContent =
    `${r.kind} | ${r.healthStatus}` + (r.healthDescription ? ` | ${r.healthDescription}` : "");

  const rows = [["id", r.id], ["parents", r.parentIds.join(", ")]];
  for (const [k, v] of Object.entries(r.metadata)) rows.push([k, v]);
  for (const [k, v] of rows) {
    const tr = document.createElement("tr");
    tr.innerHTML = `<th>${escapeHtml(k)}</th><td>${escapeHtml(v)}</td>`;
    body.appendChild(tr);
  }
  tbl.style.display = "table";
  close.style.display = "inline";
  renderGraph();
}

document.getElementById("closeDetail").onclick = () => selectResource(null);

renderSummary();
renderKinds();
selectResource(DATA.selected);
</script>
</body>
</html>
"#;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewConfig;
    use crate::resource::{CollectionKey, Platform, ResourceState};
    use crate::view::GraphView;

    #[test]
    fn embeds_view_data() {
        let config = ViewConfig::default();
        let mut view = GraphView::new(&config, Platform::Lambda);
        view.set_collection(
            CollectionKey::new("fn"),
            vec![ResourceState::new("f", "Function", "</script><b>evil")],
        );
        let html = render_html_report(&Report::from_view(&view, Platform::Lambda, &config)).unwrap();

        assert!(!html.contains("__DATA__"));
        assert!(html.contains("\"kind\":\"Function\""));
        assert!(!html.contains("</script><b>"));
    }

    #[test]
    fn detail_panel_can_be_dismissed() {
        let config = ViewConfig::default();
        let mut view = GraphView::new(&config, Platform::Kubernetes);
        view.set_collection(
            CollectionKey::new("d1"),
            vec![ResourceState::new("svc", "Service", "web")],
        );
        view.select("svc");
        let report = Report::from_view(&view, Platform::Kubernetes, &config);
        let html = render_html_report(&report).unwrap();

        assert!(html.contains(r#"<button id="closeDetail""#));
        assert!(html.contains(r#"getElementById("closeDetail").onclick = () => selectResource(null);"#));
        assert!(html.contains("\"selected\":{\"id\":\"svc\""));
    }
}
