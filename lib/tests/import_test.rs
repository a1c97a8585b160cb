use canvas_question_import::{convert, Options, Question};

fn document(items: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <questestinterop>\
           <assessment ident=\"a1\" title=\"Sample export\">\
             <section ident=\"root_section\">{items}</section>\
           </assessment>\
         </questestinterop>"
    )
}

fn metadata(qtype: &str) -> String {
    format!(
        "<itemmetadata><qtimetadata>\
           <qtimetadatafield>\
             <fieldlabel>question_type</fieldlabel>\
             <fieldentry>{qtype}</fieldentry>\
           </qtimetadatafield>\
           <qtimetadatafield>\
             <fieldlabel>points_possible</fieldlabel>\
             <fieldentry>1.0</fieldentry>\
           </qtimetadatafield>\
         </qtimetadata></itemmetadata>"
    )
}

fn true_false_item(correct_choice: &str) -> String {
    format!(
        "<item ident=\"tf1\" title=\"Capital check\">\
           {meta}\
           <presentation>\
             <material><mattext>Paris is the capital of France.</mattext></material>\
             <response_lid ident=\"response1\" rcardinality=\"Single\">\
               <render_choice>\
                 <response_label ident=\"c1\">\
                   <material><mattext>True</mattext></material>\
                 </response_label>\
                 <response_label ident=\"c2\">\
                   <material><mattext>False</mattext></material>\
                 </response_label>\
               </render_choice>\
             </response_lid>\
           </presentation>\
           <resprocessing>\
             <outcomes><decvar maxvalue=\"100\" minvalue=\"0\" varname=\"SCORE\"/></outcomes>\
             <respcondition continue=\"No\">\
               <conditionvar><varequal respident=\"response1\">{correct_choice}</varequal></conditionvar>\
               <setvar action=\"Set\" varname=\"SCORE\">100</setvar>\
             </respcondition>\
           </resprocessing>\
         </item>",
        meta = metadata("true_false_question"),
    )
}

fn short_answer_item() -> String {
    format!(
        "<item ident=\"sa1\" title=\"Capital city\">\
           {meta}\
           <presentation>\
             <material><mattext>Name the capital of France.</mattext></material>\
             <response_str ident=\"response1\"><render_fib><response_label ident=\"answer1\"/></render_fib></response_str>\
           </presentation>\
           <resprocessing>\
             <outcomes><decvar maxvalue=\"100\" minvalue=\"0\" varname=\"SCORE\"/></outcomes>\
             <respcondition continue=\"No\">\
               <conditionvar><varequal respident=\"response1\">Paris</varequal></conditionvar>\
               <setvar action=\"Set\" varname=\"SCORE\">100</setvar>\
             </respcondition>\
             <respcondition continue=\"No\">\
               <conditionvar><varequal respident=\"response1\">paris</varequal></conditionvar>\
               <setvar action=\"Set\" varname=\"SCORE\">100</setvar>\
             </respcondition>\
           </resprocessing>\
         </item>",
        meta = metadata("short_answer_question"),
    )
}

#[test]
fn true_false_and_short_answer_convert_end_to_end() {
    let xml = document(&format!("{}{}", true_false_item("c1"), short_answer_item()));

    let conversion = convert(&xml, &Options::default()).unwrap();
    assert!(conversion.diagnostics.is_empty());
    assert_eq!(conversion.questions.len(), 2);

    match &conversion.questions[0] {
        Question::TrueFalse(question) => {
            assert!(question.answer);
            assert_eq!(question.common.name, "Capital check");
            assert_eq!(
                question.common.questiontext,
                "Paris is the capital of France."
            );
        }
        question => panic!("unexpected variant: {question:?}"),
    }

    match &conversion.questions[1] {
        Question::ShortAnswer(question) => {
            assert_eq!(question.answer, vec!["Paris", "paris", "*"]);
            assert_eq!(question.fraction, vec![1.0, 1.0, 0.0]);
        }
        question => panic!("unexpected variant: {question:?}"),
    }
}

#[test]
fn false_choice_flips_the_true_false_answer() {
    let xml = document(&true_false_item("c2"));

    let conversion = convert(&xml, &Options::default()).unwrap();
    match &conversion.questions[0] {
        Question::TrueFalse(question) => assert!(!question.answer),
        question => panic!("unexpected variant: {question:?}"),
    }
}

#[test]
fn multiple_answers_split_credit_across_correct_choices() {
    let item = format!(
        "<item ident=\"ma1\" title=\"Pick two\">\
           {meta}\
           <presentation>\
             <material><mattext>Which are primary colors?</mattext></material>\
             <response_lid ident=\"response1\" rcardinality=\"Multiple\">\
               <render_choice>\
                 <response_label ident=\"c1\"><material><mattext>Red</mattext></material></response_label>\
                 <response_label ident=\"c2\"><material><mattext>Green</mattext></material></response_label>\
                 <response_label ident=\"c3\"><material><mattext>Blue</mattext></material></response_label>\
               </render_choice>\
             </response_lid>\
           </presentation>\
           <resprocessing>\
             <outcomes><decvar maxvalue=\"100\" minvalue=\"0\" varname=\"SCORE\"/></outcomes>\
             <respcondition continue=\"No\">\
               <conditionvar>\
                 <and>\
                   <varequal respident=\"response1\">c1</varequal>\
                   <varequal respident=\"response1\">c3</varequal>\
                   <not><varequal respident=\"response1\">c2</varequal></not>\
                 </and>\
               </conditionvar>\
               <setvar action=\"Set\" varname=\"SCORE\">100</setvar>\
             </respcondition>\
           </resprocessing>\
         </item>",
        meta = metadata("multiple_answers_question"),
    );

    let conversion = convert(&document(&item), &Options::default()).unwrap();
    match &conversion.questions[0] {
        Question::Multichoice(question) => {
            assert!(!question.single);
            assert_eq!(question.answer, vec!["Red", "Green", "Blue"]);
            assert_eq!(question.fraction, vec![0.5, 0.0, 0.5]);
        }
        question => panic!("unexpected variant: {question:?}"),
    }
}

#[test]
fn numerical_interval_becomes_midpoint_and_tolerance() {
    let item = format!(
        "<item ident=\"num1\" title=\"Roughly three\">\
           {meta}\
           <presentation>\
             <material><mattext>Give a number close to three.</mattext></material>\
             <response_str ident=\"response1\"><render_fib fibtype=\"Decimal\"><response_label ident=\"answer1\"/></render_fib></response_str>\
           </presentation>\
           <resprocessing>\
             <outcomes><decvar maxvalue=\"100\" minvalue=\"0\" varname=\"SCORE\"/></outcomes>\
             <respcondition continue=\"No\">\
               <conditionvar>\
                 <vargte respident=\"response1\">2.0</vargte>\
                 <varlte respident=\"response1\">4.0</varlte>\
               </conditionvar>\
               <setvar action=\"Set\" varname=\"SCORE\">100</setvar>\
             </respcondition>\
           </resprocessing>\
         </item>",
        meta = metadata("numerical_question"),
    );

    let conversion = convert(&document(&item), &Options::default()).unwrap();
    match &conversion.questions[0] {
        Question::Numerical(question) => {
            assert_eq!(question.answer, vec![3.0]);
            assert_eq!(question.tolerance, vec![1.0]);
            assert_eq!(question.fraction, vec![1.0]);
        }
        question => panic!("unexpected variant: {question:?}"),
    }
}

fn matching_subquestion(ident: &str, text: &str, prefix: &str) -> String {
    format!(
        "<response_lid ident=\"{ident}\">\
           <material><mattext>{text}</mattext></material>\
           <render_choice>\
             <response_label ident=\"{prefix}1\"><material><mattext>Red</mattext></material></response_label>\
             <response_label ident=\"{prefix}2\"><material><mattext>Blue</mattext></material></response_label>\
             <response_label ident=\"{prefix}3\"><material><mattext>Green</mattext></material></response_label>\
           </render_choice>\
         </response_lid>"
    )
}

#[test]
fn matching_question_pairs_and_distractors() {
    let item = format!(
        "<item ident=\"m1\" title=\"Match colors\">\
           {meta}\
           <presentation>\
             <material><mattext>Match each thing to its color.</mattext></material>\
             {s1}{s2}\
           </presentation>\
           <resprocessing>\
             <outcomes><decvar maxvalue=\"100\" minvalue=\"0\" varname=\"SCORE\"/></outcomes>\
             <respcondition>\
               <conditionvar><varequal respident=\"s1\">a1</varequal></conditionvar>\
               <setvar varname=\"SCORE\">50</setvar>\
             </respcondition>\
             <respcondition>\
               <conditionvar><varequal respident=\"s2\">b2</varequal></conditionvar>\
               <setvar varname=\"SCORE\">50</setvar>\
             </respcondition>\
           </resprocessing>\
         </item>",
        meta = metadata("matching_question"),
        s1 = matching_subquestion("s1", "Tomato", "a"),
        s2 = matching_subquestion("s2", "Sky", "b"),
    );

    let conversion = convert(&document(&item), &Options::default()).unwrap();
    assert!(conversion.diagnostics.is_empty());
    match &conversion.questions[0] {
        Question::Matching(question) => {
            assert_eq!(question.subquestions, vec!["Tomato", "Sky", ""]);
            assert_eq!(question.subanswers, vec!["Red", "Blue", "Green"]);
        }
        question => panic!("unexpected variant: {question:?}"),
    }
}

#[test]
fn undersized_matching_question_is_rejected_not_fatal() {
    let item = format!(
        "<item ident=\"m2\" title=\"Too small\">\
           {meta}\
           <presentation>\
             <material><mattext>Match the only thing.</mattext></material>\
             <response_lid ident=\"s1\">\
               <material><mattext>Tomato</mattext></material>\
               <render_choice>\
                 <response_label ident=\"a1\"><material><mattext>Red</mattext></material></response_label>\
                 <response_label ident=\"a2\"><material><mattext>Blue</mattext></material></response_label>\
               </render_choice>\
             </response_lid>\
           </presentation>\
           <resprocessing>\
             <outcomes><decvar maxvalue=\"100\" minvalue=\"0\" varname=\"SCORE\"/></outcomes>\
             <respcondition>\
               <conditionvar><varequal respident=\"s1\">a1</varequal></conditionvar>\
               <setvar varname=\"SCORE\">100</setvar>\
             </respcondition>\
           </resprocessing>\
         </item>",
        meta = metadata("matching_question"),
    );
    let xml = document(&format!("{}{}", item, true_false_item("c1")));

    let conversion = convert(&xml, &Options::default()).unwrap();
    // The matching item is dropped with a diagnostic; the batch continues.
    assert_eq!(conversion.questions.len(), 1);
    assert_eq!(conversion.diagnostics.len(), 1);
    assert!(conversion.diagnostics[0].message.contains("matching question"));
    assert_eq!(conversion.diagnostics[0].context.as_deref(), Some("m2"));
}

#[test]
fn dropdowns_become_embedded_answer_text() {
    let item = format!(
        "<item ident=\"dd1\" title=\"Poem\">\
           {meta}\
           <presentation>\
             <material><mattext>Roses are [color1] and violets are [color2].</mattext></material>\
             <response_lid ident=\"response_color1\">\
               <material><mattext>color1</mattext></material>\
               <render_choice>\
                 <response_label ident=\"c1\"><material><mattext>red</mattext></material></response_label>\
                 <response_label ident=\"c2\"><material><mattext>blue</mattext></material></response_label>\
               </render_choice>\
             </response_lid>\
             <response_lid ident=\"response_color2\">\
               <material><mattext>color2</mattext></material>\
               <render_choice>\
                 <response_label ident=\"d1\"><material><mattext>red</mattext></material></response_label>\
                 <response_label ident=\"d2\"><material><mattext>blue</mattext></material></response_label>\
               </render_choice>\
             </response_lid>\
           </presentation>\
           <resprocessing>\
             <outcomes><decvar maxvalue=\"100\" minvalue=\"0\" varname=\"SCORE\"/></outcomes>\
             <respcondition>\
               <conditionvar><varequal respident=\"response_color1\">c1</varequal></conditionvar>\
               <setvar varname=\"SCORE\">50</setvar>\
             </respcondition>\
             <respcondition>\
               <conditionvar><varequal respident=\"response_color2\">d2</varequal></conditionvar>\
               <setvar varname=\"SCORE\">50</setvar>\
             </respcondition>\
           </resprocessing>\
         </item>",
        meta = metadata("multiple_dropdowns_question"),
    );

    let conversion = convert(&document(&item), &Options::default()).unwrap();
    match &conversion.questions[0] {
        Question::Multianswer(question) => {
            assert_eq!(
                question.common.questiontext,
                "Roses are {1:MULTICHOICE:%100%red~blue} and violets are \
                 {1:MULTICHOICE:red~%100%blue}."
            );
            assert_eq!(question.penalty, 0.3333333);
        }
        question => panic!("unexpected variant: {question:?}"),
    }
}

#[test]
fn essay_description_and_calculated_items() {
    let essay = format!(
        "<item ident=\"e1\" title=\"Essay\">\
           {meta}\
           <presentation><material><mattext>Discuss.</mattext></material></presentation>\
         </item>",
        meta = metadata("essay_question"),
    );
    let description = format!(
        "<item ident=\"d1\" title=\"Intro\">\
           {meta}\
           <presentation><material><mattext>Read the following text.</mattext></material></presentation>\
         </item>",
        meta = metadata("text_only_question"),
    );
    let calculated = format!(
        "<item ident=\"calc1\" title=\"Calculated\">\
           {meta}\
           <presentation><material><mattext>Compute [x] + [y].</mattext></material></presentation>\
         </item>",
        meta = metadata("calculated_question"),
    );
    let xml = document(&format!("{essay}{description}{calculated}"));

    let conversion = convert(&xml, &Options::default()).unwrap();
    assert_eq!(conversion.questions.len(), 2);
    assert_eq!(conversion.diagnostics.len(), 1);

    match &conversion.questions[0] {
        Question::Essay(question) => {
            assert_eq!(question.attachments, 0);
            assert!(question.responserequired);
        }
        question => panic!("unexpected variant: {question:?}"),
    }
    match &conversion.questions[1] {
        Question::Description(question) => assert_eq!(question.common.defaultmark, 0.0),
        question => panic!("unexpected variant: {question:?}"),
    }
}

#[test]
fn unknown_types_are_reported_and_skipped() {
    let item = format!(
        "<item ident=\"u1\" title=\"Mystery\">\
           {meta}\
           <presentation><material><mattext>?</mattext></material></presentation>\
         </item>",
        meta = metadata("hotspot_question"),
    );

    let conversion = convert(&document(&item), &Options::default()).unwrap();
    assert!(conversion.questions.is_empty());
    assert_eq!(conversion.diagnostics.len(), 1);
    assert!(conversion.diagnostics[0]
        .message
        .contains("hotspot_question"));
}

#[test]
fn malformed_documents_fail_the_whole_conversion() {
    assert!(convert("<questestinterop><assessment>", &Options::default()).is_err());
}

#[test]
fn questions_serialize_with_their_qtype_tag() {
    let xml = document(&true_false_item("c1"));

    let conversion = convert(&xml, &Options::default()).unwrap();
    let json = serde_json::to_value(&conversion.questions[0]).unwrap();
    assert_eq!(json["qtype"], "truefalse");
    assert_eq!(json["name"], "Capital check");
    assert_eq!(json["answer"], true);
}
